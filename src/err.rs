use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum StreamErr {
    #[error("[Optional] Value is absent")]
    Absent,

    #[error("[Optional] Nil value can not be wrapped as a present value")]
    NilValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(StreamErr::Absent.to_string(), "[Optional] Value is absent");
        assert_eq!(StreamErr::NilValue.to_string(), "[Optional] Nil value can not be wrapped as a present value");
    }
}
