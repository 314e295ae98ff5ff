//! Codec backends for [`ArchiveReader`](crate::ArchiveReader).

mod dir;
mod sevenz;
mod zip;

pub use dir::DirArchive;
pub use sevenz::SevenZArchive;
pub use self::zip::ZipArchive;
