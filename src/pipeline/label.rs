use std::path::Path;

use lofty::prelude::*;

/// Display label for a track: `"artist - title"` from its tags when both are present, else
/// whichever one is, else the file name.
pub fn track_label(path: &Path) -> String {
    let fallback = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let tagged = match lofty::read_from_path(path) {
        Ok(tagged) => tagged,
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "no readable tags, using file name");
            return fallback;
        }
    };
    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return fallback;
    };

    let artist = tag.artist();
    let title = tag.title();
    compose_label(artist.as_deref(), title.as_deref(), &fallback)
}

pub(crate) fn compose_label(artist: Option<&str>, title: Option<&str>, fallback: &str) -> String {
    let artist = artist.map(str::trim).filter(|s| !s.is_empty());
    let title = title.map(str::trim).filter(|s| !s.is_empty());
    match (artist, title) {
        (Some(a), Some(t)) => format!("{a} - {t}"),
        (Some(one), None) | (None, Some(one)) => one.to_owned(),
        (None, None) => fallback.to_owned(),
    }
}
