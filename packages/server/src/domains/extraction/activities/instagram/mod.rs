//! Instagram-only strategies that read the post page directly.

pub mod carousel;
pub mod page;
pub mod reel;
pub mod shared_data;

pub use carousel::{CarouselExtractor, CarouselScan};
pub use page::{fetch_post_page, InstagramPage};
pub use reel::ReelPageExtractor;
pub use shared_data::SharedData;
