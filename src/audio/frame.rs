use std::ops::AddAssign;

// One stereo frame. Every scene is centred, so most frames are built with
// `mono`; the stereo layout is what the device and the WAV writer want.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    pub fn zero() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mono(sample: f32) -> Self {
        Self { left: sample, right: sample }
    }

    #[inline]
    pub fn scale(&mut self, gain: f32) {
        self.left *= gain;
        self.right *= gain;
    }
}

impl AddAssign for StereoFrame {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.left += other.left;
        self.right += other.right;
    }
}
