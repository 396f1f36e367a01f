/// A single camera frame: opaque pixel bytes plus capture metadata.
///
/// The pipeline never inspects pixel data; it only forwards the frame to the
/// detector and reads its timestamp and dimensions. Frames are borrowed for
/// one capture cycle and never retained past it.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    timestamp: i64,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp: i64) -> Self {
        Self {
            data,
            width,
            height,
            timestamp,
        }
    }

    /// A frame without pixel payload, for sources that hand pixels to the
    /// detector out of band.
    pub fn empty(width: u32, height: u32, timestamp: i64) -> Self {
        Self::new(Vec::new(), width, height, timestamp)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Monotonic capture clock value.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
