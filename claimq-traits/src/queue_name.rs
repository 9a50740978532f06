use std::fmt;

/// Canonical name of a logical queue.
///
/// Names are compared by their string form, so every value that displays as
/// `"orders"` refers to the same queue.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueueName(String);

/// Conversion of any displayable value into a [QueueName]
pub trait IntoQueueName: Send {
    fn into_queue_name(self) -> QueueName;
}

impl<T: fmt::Display + Send> IntoQueueName for T {
    fn into_queue_name(self) -> QueueName {
        QueueName(self.to_string())
    }
}

impl QueueName {
    pub fn new(name: impl IntoQueueName) -> Self {
        name.into_queue_name()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for QueueName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for QueueName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Queues {
        Orders,
    }

    impl fmt::Display for Queues {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Queues::Orders => f.write_str("orders"),
            }
        }
    }

    #[test]
    fn representations_normalize_to_the_same_name() {
        let from_str = QueueName::new("orders");
        let from_string = QueueName::new("orders".to_owned());
        let from_enum = QueueName::new(Queues::Orders);
        assert_eq!(from_str, from_string);
        assert_eq!(from_str, from_enum);
        assert_eq!(from_str, "orders");
    }

    #[test]
    fn numbers_are_valid_names() {
        assert_eq!(QueueName::new(21), "21");
        assert_eq!(QueueName::new(21), QueueName::new("21"));
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_ne!(QueueName::new("Orders"), QueueName::new("orders"));
    }

    #[test]
    fn queue_name_converts_into_itself() {
        let name = QueueName::new("orders");
        assert_eq!(QueueName::new(name.clone()), name);
    }
}
