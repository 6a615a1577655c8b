use super::*;

#[test]
fn test_error_display() {
    assert_eq!(error!(InvalidConfig).to_string(), "INVALID CONFIG");
    let e = error!(UndefinedMap; "start map 9");
    assert!(e.is(ErrorCode::UndefinedMap));
    assert_eq!(e.to_string(), "UNDEFINED MAP IN; start map 9");
    let e = error!(DuplicateId, 4; "troop");
    assert_eq!(e.code(), 3);
    assert_eq!(e.to_string(), "DUPLICATE ID IN EVENT 4; troop");
}

#[test]
fn test_io_error_codes() {
    let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(Error::from(missing).is(ErrorCode::FileNotFound));
    let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
    assert_eq!(Error::from(denied).to_string(), "I/O ERROR IN; no");
}
