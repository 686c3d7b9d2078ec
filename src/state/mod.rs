pub mod context;
pub mod persistence;

pub use context::EditorContext;
pub use persistence::{
    CanvasSnapshot,
    FileSnapshotStore,
    LatestSnapshot,
    PersistenceError,
    PersistenceResult,
    SnapshotMetadata,
    SnapshotSink,
};
