use serde::{Deserialize, Serialize};

/// One RSS/Atom feed to poll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// The builtin 3D-printing catalog: vendor blogs, news sites and a few
/// YouTube channels (YouTube exposes channel uploads as Atom feeds).
pub fn default_sources() -> Vec<FeedSource> {
    [
        ("Bambu Lab", "https://blog.bambulab.com/feed/"),
        ("Hackaday", "https://hackaday.com/blog/category/3d-printing/feed/"),
        ("3DPrint.com", "https://3dprint.com/feed/"),
        ("All3DP", "https://all3dp.com/feed/"),
        ("3DNatives", "https://www.3dnatives.com/feed/"),
        ("Prusa", "https://blog.prusa3d.com/feed/"),
        ("VoxelMatters", "https://www.voxelmatters.com/feed/"),
        ("3D Printing Industry", "https://3dprintingindustry.com/feed/"),
        ("Tom's Hardware", "https://www.tomshardware.com/rss/3d-printing"),
        ("Cults3D", "https://cults3d.com/fr/flux-de-conception.rss"),
        ("Thingiverse", "https://www.thingiverse.com/rss/newest"),
        ("Hackster", "https://www.hackster.io/feed"),
        (
            "CNC Kitchen",
            "https://www.youtube.com/feeds/videos.xml?channel_id=UCiczXOhuGQTn7IDuScwQbFA",
        ),
        (
            "3D Printing Nerd",
            "https://www.youtube.com/feeds/videos.xml?channel_id=UC_7aK9qzG95xeVXYY9Wf0fQ",
        ),
        (
            "Teaching Tech",
            "https://www.youtube.com/feeds/videos.xml?channel_id=UCtnGthnw9ps86S96s9D6nsw",
        ),
        (
            "Uncle Jessy",
            "https://www.youtube.com/feeds/videos.xml?channel_id=UC5Lbnd97xsY-W3Xy7nMFIDg",
        ),
    ]
    .into_iter()
    .map(|(name, url)| FeedSource::new(name, url))
    .collect()
}
