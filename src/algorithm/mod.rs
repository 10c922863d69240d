/// Opacity policies filling the alpha buffer
pub mod alpha;
/// Channel façade and frame step
pub mod channel;
/// Sample to pixel packing codec
pub mod packing;
/// Byte patterns and the streaming matcher
pub mod patterns;
/// Raw ingest window and clock modes
pub mod window;
