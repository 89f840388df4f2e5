//! Media and feed fixtures

use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Encoded PNG of the given dimensions
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Write `contents` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, contents: &[u8]) -> PathBuf {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, contents).unwrap();
    path
}

/// RSS 2.0 document with an iTunes show image and one enclosure per episode
///
/// Episode audio is served from `{base_url}/{n}.mp3`, numbered from 1.
pub fn rss_feed(title: &str, base_url: &str, episodes: &[&str]) -> String {
    let items: String = episodes
        .iter()
        .enumerate()
        .map(|(i, episode)| {
            format!(
                r#"
    <item>
      <title>{episode}</title>
      <description>About {episode}</description>
      <enclosure url="{base_url}/{n}.mp3" length="5" type="audio/mpeg"/>
    </item>"#,
                n = i + 1
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel>
    <title>{title}</title>
    <link>{base_url}</link>
    <description>A show about tests</description>
    <itunes:image href="{base_url}/cover.png"/>{items}
  </channel>
</rss>"#
    )
}
