use std::path::Path;

use anyhow::Result;

use crate::player::PlayingItem;

/// Embedded front cover of the playing file, if it has one.
///
/// Streams and empty items never have cover art. Files are looked up below
/// `music_directory`, the same root the daemon serves from.
#[cfg(feature = "mpd")]
pub fn cover_art(music_directory: &Path, item: &PlayingItem) -> Option<Vec<u8>> {
    if item.kind != crate::player::ItemKind::File {
        return None;
    }
    let path = music_directory.join(&item.file_uri);
    match extract_embedded_art(&path) {
        Ok(art) => art,
        Err(e) => {
            tracing::debug!(path = %path.display(), "No cover art: {}", e);
            None
        }
    }
}

/// Extract embedded album art from audio file (FLAC, MP3, etc.)
#[cfg(feature = "mpd")]
fn extract_embedded_art(file_path: &Path) -> Result<Option<Vec<u8>>> {
    use lofty::file::TaggedFileExt;
    use lofty::picture::PictureType;

    let tagged_file = lofty::read_from_path(file_path)?;

    for tag in tagged_file.tags() {
        for picture in tag.pictures() {
            if picture.pic_type() == PictureType::CoverFront || picture.pic_type() == PictureType::Other {
                return Ok(Some(picture.data().to_vec()));
            }
        }
    }
    Ok(None)
}

#[cfg(not(feature = "mpd"))]
pub fn cover_art(_music_directory: &Path, _item: &PlayingItem) -> Option<Vec<u8>> {
    None
}

/// Writes the cover of `item` to `dest`; returns whether there was one.
pub fn save_cover_art(music_directory: &Path, item: &PlayingItem, dest: &Path) -> Result<bool> {
    match cover_art(music_directory, item) {
        Some(bytes) => {
            std::fs::write(dest, bytes)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
