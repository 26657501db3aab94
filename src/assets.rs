use include_dir::{include_dir, Dir};
use itertools::Itertools;

use crate::flow::ResultsVariant;

static ASSETS: Dir = include_dir!("assets");

/// Banner slides for the attention task, in file name order
pub fn banners() -> Vec<&'static str> {
    ASSETS
        .get_dir("banners")
        .map(|dir| {
            dir.files()
                .sorted_by(|a, b| a.path().cmp(b.path()))
                .filter_map(|file| file.contents_utf8())
                .collect()
        })
        .unwrap_or_default()
}

pub fn results_art(variant: ResultsVariant) -> &'static str {
    ASSETS
        .get_file(format!("results/{}.txt", variant))
        .and_then(|file| file.contents_utf8())
        .unwrap_or("")
}
