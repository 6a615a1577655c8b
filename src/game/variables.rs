/// ## Switch memory
///
/// Ids are 1-based. Reading an id that was never written is `false`.

#[derive(Debug, Default, Clone)]
pub struct Switches {
    data: Vec<bool>,
}

impl Switches {
    pub fn new() -> Switches {
        Switches::default()
    }

    pub fn get(&self, id: i32) -> bool {
        if id <= 0 {
            return false;
        }
        self.data.get(id as usize - 1).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: i32, value: bool) {
        if id <= 0 {
            tracing::warn!(id, "invalid switch id");
            return;
        }
        let index = id as usize - 1;
        if index >= self.data.len() {
            if !value {
                return;
            }
            self.data.resize(index + 1, false);
        }
        self.data[index] = value;
    }

    pub fn flip(&mut self, id: i32) {
        let value = !self.get(id);
        self.set(id, value);
    }

    pub fn set_range(&mut self, first: i32, last: i32, value: bool) {
        for id in first..=last {
            self.set(id, value);
        }
    }

    pub fn flip_range(&mut self, first: i32, last: i32) {
        for id in first..=last {
            self.flip(id);
        }
    }
}

/// Arithmetic applied by `ControlVars`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarOp {
    Set,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl VarOp {
    pub fn from_param(op: i32) -> Option<VarOp> {
        match op {
            0 => Some(VarOp::Set),
            1 => Some(VarOp::Add),
            2 => Some(VarOp::Sub),
            3 => Some(VarOp::Mul),
            4 => Some(VarOp::Div),
            5 => Some(VarOp::Mod),
            _ => None,
        }
    }
}

/// ## Variable memory
///
/// Every write is clamped to `[min, max]`. Division and modulo by
/// zero leave the variable untouched.

#[derive(Debug, Clone)]
pub struct Variables {
    data: Vec<i32>,
    min: i32,
    max: i32,
}

impl Default for Variables {
    fn default() -> Variables {
        Variables::new(-9_999_999, 9_999_999)
    }
}

impl Variables {
    pub fn new(min: i32, max: i32) -> Variables {
        Variables {
            data: vec![],
            min,
            max,
        }
    }

    pub fn get(&self, id: i32) -> i32 {
        if id <= 0 {
            return 0;
        }
        self.data.get(id as usize - 1).copied().unwrap_or(0)
    }

    /// The variable whose id is stored in variable `id`.
    pub fn get_indirect(&self, id: i32) -> i32 {
        self.get(self.get(id))
    }

    pub fn set(&mut self, id: i32, value: i32) {
        self.store(id, value as i64)
    }

    pub fn operate(&mut self, id: i32, op: VarOp, operand: i32) {
        let current = self.get(id) as i64;
        let operand = operand as i64;
        let value = match op {
            VarOp::Set => operand,
            VarOp::Add => current + operand,
            VarOp::Sub => current - operand,
            VarOp::Mul => current * operand,
            VarOp::Div => {
                if operand == 0 {
                    return;
                }
                current / operand
            }
            VarOp::Mod => {
                if operand == 0 {
                    return;
                }
                current % operand
            }
        };
        self.store(id, value);
    }

    pub fn operate_range(&mut self, first: i32, last: i32, op: VarOp, operand: i32) {
        for id in first..=last {
            self.operate(id, op, operand);
        }
    }

    pub fn bounds(&self) -> (i32, i32) {
        (self.min, self.max)
    }

    fn store(&mut self, id: i32, value: i64) {
        if id <= 0 {
            tracing::warn!(id, "invalid variable id");
            return;
        }
        let value = value.max(self.min as i64).min(self.max as i64) as i32;
        let index = id as usize - 1;
        if index >= self.data.len() {
            if value == 0 {
                return;
            }
            self.data.resize(index + 1, 0);
        }
        self.data[index] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_reads_default() {
        let s = Switches::new();
        assert!(!s.get(40));
        assert!(!s.get(0));
        let v = Variables::default();
        assert_eq!(v.get(12), 0);
        assert_eq!(v.get(-3), 0);
    }

    #[test]
    fn test_clamp_on_add() {
        let mut v = Variables::default();
        v.set(1, 9_999_999);
        v.operate(1, VarOp::Add, 5);
        assert_eq!(v.get(1), 9_999_999);
        v.operate(1, VarOp::Mul, -3);
        assert_eq!(v.get(1), -9_999_999);
    }

    #[test]
    fn test_divide_by_zero_is_noop() {
        let mut v = Variables::default();
        v.set(2, 17);
        v.operate(2, VarOp::Div, 0);
        v.operate(2, VarOp::Mod, 0);
        assert_eq!(v.get(2), 17);
        v.operate(2, VarOp::Mod, 5);
        assert_eq!(v.get(2), 2);
    }

    #[test]
    fn test_indirect() {
        let mut v = Variables::default();
        v.set(1, 5);
        v.set(5, 42);
        assert_eq!(v.get_indirect(1), 42);
    }

    #[test]
    fn test_switch_ranges() {
        let mut s = Switches::new();
        s.set_range(3, 5, true);
        assert!(s.get(3) && s.get(4) && s.get(5));
        s.flip_range(4, 6);
        assert!(s.get(3));
        assert!(!s.get(4));
        assert!(s.get(6));
    }
}
