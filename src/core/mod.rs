pub mod clock;
pub mod form_data;
pub mod render_input;
pub mod status;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use form_data::FormData;
pub use render_input::{AnnotationData, QueryResult, RenderInput, same_payload};
pub use status::{ChartStatus, InMemoryStatusStore, StatusEntry, StatusSnapshot, StatusStore};
pub use types::{AttemptId, CacheBuster, ChartId, Viewport, VizType};
