use thiserror::Error;

use crate::tree::NodeKind;

#[derive(Error, Debug)]
pub enum MctsError {
    #[error("Simulator error: {0}")]
    Simulator(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("Root has no action children after search: {}", describe_empty_root(.kind))]
    EmptyRoot { kind: NodeKind },

    #[error("Invalid node ID: {0}")]
    InvalidNodeId(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MctsError {
    /// Wrap an error raised by a simulator call
    pub fn simulator<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        MctsError::Simulator(Box::new(err))
    }
}

fn describe_empty_root(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Terminal => "root state is terminal, there is nothing to choose",
        NodeKind::Chance => "root state is a chance node, outcomes carry no action",
        NodeKind::Decision => {
            "root was classified as a decision node but reported no legal actions"
        }
    }
}

pub type Result<T> = std::result::Result<T, MctsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_root_message_names_misclassification() {
        let err = MctsError::EmptyRoot {
            kind: NodeKind::Decision,
        };
        let msg = err.to_string();
        assert!(msg.contains("no legal actions"), "got: {msg}");
    }

    #[test]
    fn test_simulator_error_keeps_source() {
        let io = std::io::Error::other("boom");
        let err = MctsError::simulator(io);
        assert!(err.to_string().contains("boom"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
