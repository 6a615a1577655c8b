use crate::game::Game;

/// Mode 0 is the literal, anything else reads variable `value`.
pub fn value_or_variable(game: &Game, mode: i32, value: i32) -> i32 {
    match mode {
        0 => value,
        _ => game.variables.get(value),
    }
}

/// Operand of an increase (`op == 0`) or decrease (`op == 1`).
pub fn operate_value(game: &Game, op: i32, operand_type: i32, operand: i32) -> i32 {
    let value = value_or_variable(game, operand_type, operand);
    if op == 1 {
        -value
    } else {
        value
    }
}

/// Actors a command applies to. Mode 0 is the whole party, 1 a literal
/// actor id, 2 an actor id read from a variable. Unknown actors give an
/// empty set.
pub fn actor_ids(game: &Game, mode: i32, value: i32) -> Vec<i32> {
    let id = match mode {
        0 => return game.party.members.clone(),
        1 => value,
        2 => game.variables.get(value),
        _ => {
            tracing::warn!(mode, "unknown actor selection");
            return vec![];
        }
    };
    if game.actors.get(id).is_none() {
        tracing::warn!(id, "actor not found");
        return vec![];
    }
    vec![id]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Database;

    fn game() -> Game {
        let db = Database::from_json(
            r#"{"actors": [{"id": 1}, {"id": 2}], "start": {"party": [2, 1]}}"#,
        )
        .unwrap();
        Game::with_seed(&db, 1)
    }

    #[test]
    fn test_operands() {
        let mut g = game();
        g.variables.set(3, 12);
        assert_eq!(value_or_variable(&g, 0, 3), 3);
        assert_eq!(value_or_variable(&g, 1, 3), 12);
        assert_eq!(operate_value(&g, 1, 1, 3), -12);
        assert_eq!(operate_value(&g, 0, 0, 7), 7);
    }

    #[test]
    fn test_actor_sets() {
        let mut g = game();
        assert_eq!(actor_ids(&g, 0, 0), vec![2, 1]);
        assert_eq!(actor_ids(&g, 1, 2), vec![2]);
        assert!(actor_ids(&g, 1, 9).is_empty());
        g.variables.set(4, 1);
        assert_eq!(actor_ids(&g, 2, 4), vec![1]);
    }
}
