mod draw_request;
mod null_engine;

use std::cell::RefCell;
use std::rc::Rc;

pub use draw_request::{DrawEngineKind, DrawRequest};
pub use null_engine::NullDrawingEngine;

use crate::error::ChartResult;

/// Contract implemented by any drawing backend.
///
/// `begin_draw` only starts the work. The engine reports the outcome exactly
/// once per attempt through the supervisor's success/failure callbacks, using
/// the chart id and attempt carried by the request. An `Err` here means the
/// draw could not start and is treated as an immediate failure.
pub trait DrawingEngine {
    fn begin_draw(&mut self, request: DrawRequest) -> ChartResult<()>;
}

impl<E: DrawingEngine + ?Sized> DrawingEngine for Rc<RefCell<E>> {
    fn begin_draw(&mut self, request: DrawRequest) -> ChartResult<()> {
        self.borrow_mut().begin_draw(request)
    }
}
