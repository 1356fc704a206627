use crate::error::ChartResult;
use crate::render::{DrawRequest, DrawingEngine};

/// Headless engine used by tests and hosts without a drawing backend.
///
/// It still validates each request and keeps it pending so the caller can
/// resolve the attempt later, like a real asynchronous engine would.
#[derive(Debug, Default)]
pub struct NullDrawingEngine {
    pending: Vec<DrawRequest>,
    pub started_count: usize,
}

impl NullDrawingEngine {
    #[must_use]
    pub fn pending(&self) -> &[DrawRequest] {
        &self.pending
    }

    pub fn take_pending(&mut self) -> Vec<DrawRequest> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn last_request(&self) -> Option<&DrawRequest> {
        self.pending.last()
    }
}

impl DrawingEngine for NullDrawingEngine {
    fn begin_draw(&mut self, request: DrawRequest) -> ChartResult<()> {
        request.validate()?;
        self.started_count += 1;
        self.pending.push(request);
        Ok(())
    }
}
