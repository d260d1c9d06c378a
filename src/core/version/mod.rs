// ─── Versions ───
// Server jar naming, version records and the active-slot collection.

pub mod collection;
pub mod jar_name;
pub mod record;

pub use collection::{parse_selection, InvalidSelection, Selection, VersionCollection};
pub use jar_name::JarName;
pub use record::{LocationState, PrepareOutcome, VersionRecord};
