#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CellsCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct WallsCount(pub usize);

impl Width {
    /// Number of distinct walls in a grid of this width and the given height.
    pub fn walls_count(self, height: Height) -> WallsCount {
        let (Width(w), Height(h)) = (self, height);
        WallsCount(w * (h + 1) + (w + 1) * h)
    }
}
