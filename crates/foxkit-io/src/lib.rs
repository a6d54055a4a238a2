//! foxkit-io: asset loading and the media-extraction worker seam.
//!
//! Both are external collaborators from the framework's point of view: the
//! scene layer consumes opaque handles and typed events, never the raw
//! decoding or network machinery behind them.

mod assets;
mod extract;

pub use assets::{AssetError, AssetLoader, FontAsset, ImageHandle, SoundHandle};
pub use extract::{
    ExtractFormat, ExtractionEvent, ExtractionJob, ExtractionRequest, Extractor, JobFeed,
    ThreadExtractor,
};
