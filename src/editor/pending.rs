use std::sync::mpsc;

use crate::assets::read_image_size;
use crate::foundation::core::{Point, Size};
use crate::foundation::error::{MemoriesError, MemoriesResult};

#[derive(Debug)]
pub(crate) struct DecodedImage {
    pub(crate) bytes: Vec<u8>,
    pub(crate) natural_size: Size,
}

/// An image being sized on the rayon pool, tagged with the session that started
/// it and that session's generation at the time.
///
/// Dropping it abandons the result; the worker finishes and its send fails
/// quietly.
#[derive(Debug)]
pub struct PendingImage {
    session: uuid::Uuid,
    generation: u64,
    center: Point,
    rx: mpsc::Receiver<MemoriesResult<DecodedImage>>,
}

impl PendingImage {
    pub(crate) fn spawn(
        session: uuid::Uuid,
        generation: u64,
        bytes: Vec<u8>,
        center: Point,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        rayon::spawn(move || {
            let decoded =
                read_image_size(&bytes).map(|natural_size| DecodedImage { bytes, natural_size });
            let _ = tx.send(decoded);
        });
        Self {
            session,
            generation,
            center,
            rx,
        }
    }

    pub(crate) fn session(&self) -> uuid::Uuid {
        self.session
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Block until the worker reports.
    pub(crate) fn wait(self) -> MemoriesResult<DecodedImage> {
        self.rx
            .recv()
            .map_err(|_| MemoriesError::decode("image decode worker exited without a result"))?
    }
}
