use std::fmt;

use crate::OperationId;

/// All event types emitted while serving a listing.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// A listing request passed validation and is about to read the catalog.
    ListStarted { op_id: OperationId },
    /// The listing reached a pipeline stage.
    ListStage {
        op_id: OperationId,
        stage: ListStage,
    },
    /// Metadata for an entity could not be computed; the entity was dropped.
    MetadataFailure {
        op_id: OperationId,
        entity_id: String,
        error: String,
    },
    /// The listing finished.
    ListComplete {
        op_id: OperationId,
        returned: usize,
        dropped: usize,
    },
    /// Generic log message.
    Log { level: LogLevel, message: String },
}

/// Pipeline stages of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStage {
    Querying,
    Filtered { visible: usize },
    Resolved { latest: usize },
    Sorted,
    Composing { total: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl StoreEvent {
    pub fn op_id(&self) -> Option<OperationId> {
        match self {
            StoreEvent::ListStarted { op_id }
            | StoreEvent::ListStage { op_id, .. }
            | StoreEvent::MetadataFailure { op_id, .. }
            | StoreEvent::ListComplete { op_id, .. } => Some(*op_id),
            StoreEvent::Log { .. } => None,
        }
    }
}

impl fmt::Display for StoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreEvent::ListStarted { op_id } => write!(f, "list #{op_id} started"),
            StoreEvent::ListStage { op_id, stage } => {
                match stage {
                    ListStage::Querying => write!(f, "list #{op_id}: querying catalog"),
                    ListStage::Filtered { visible } => {
                        write!(f, "list #{op_id}: {visible} visible entities")
                    }
                    ListStage::Resolved { latest } => {
                        write!(f, "list #{op_id}: {latest} latest revisions")
                    }
                    ListStage::Sorted => write!(f, "list #{op_id}: sorted"),
                    ListStage::Composing { total } => {
                        write!(f, "list #{op_id}: composing metadata for {total} entities")
                    }
                }
            }
            StoreEvent::MetadataFailure {
                entity_id, error, ..
            } => write!(f, "cannot retrieve metadata for {entity_id}: {error}"),
            StoreEvent::ListComplete {
                op_id,
                returned,
                dropped,
            } => {
                write!(
                    f,
                    "list #{op_id} complete: {returned} results, {dropped} dropped"
                )
            }
            StoreEvent::Log { message, .. } => f.write_str(message),
        }
    }
}
