use crate::config::RELEASES;

/// A selectable build: what the button says and where the build lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Release {
    pub label: &'static str,
    pub dir_name: &'static str,
}

pub fn list_releases() -> Vec<Release> {
    RELEASES
        .iter()
        .map(|&(label, dir_name)| Release { label, dir_name })
        .collect()
}
