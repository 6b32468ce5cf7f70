/// Read-only row access over a single-channel 2-D buffer.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    /// Number of samples covered by the view.
    fn sample_count(&self) -> usize {
        self.width() * self.height()
    }
}
