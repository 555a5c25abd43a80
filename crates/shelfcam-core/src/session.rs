use crate::sanitize::sanitize_filename;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub filename: String,
    pub data: Vec<u8>,
    pub row_number: u32,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LabelImages {
    label: String,
    images: Vec<CapturedImage>,
    last_sequence: u32,
}

/// Images waiting for upload, grouped by catalog display label.
///
/// Labels keep the order in which they first received an image and images
/// keep capture order. Sequence numbers in filenames only grow: removing an
/// image never renumbers the others and never frees its number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureSession {
    groups: Vec<LabelImages>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_image(
        &mut self,
        label: &str,
        data: Vec<u8>,
        row_number: u32,
        model: &str,
    ) -> &CapturedImage {
        let index = match self.groups.iter().position(|group| group.label == label) {
            Some(index) => index,
            None => {
                self.groups.push(LabelImages {
                    label: label.to_string(),
                    images: Vec::new(),
                    last_sequence: 0,
                });
                self.groups.len() - 1
            }
        };

        let group = &mut self.groups[index];
        group.last_sequence += 1;
        let filename = sanitize_filename(format!("{model}_{}.jpg", group.last_sequence));
        group.images.push(CapturedImage {
            filename,
            data,
            row_number,
            model: model.to_string(),
        });

        &group.images[group.images.len() - 1]
    }

    pub fn remove_image(&mut self, label: &str, index: usize) -> Option<CapturedImage> {
        let group = self.groups.iter_mut().find(|group| group.label == label)?;
        if index >= group.images.len() {
            return None;
        }
        Some(group.images.remove(index))
    }

    pub fn clear_all(&mut self) {
        self.groups.clear();
    }

    pub fn has_any_images(&self) -> bool {
        self.groups.iter().any(|group| !group.images.is_empty())
    }

    pub fn image_count(&self) -> usize {
        self.groups.iter().map(|group| group.images.len()).sum()
    }

    pub fn images(&self, label: &str) -> &[CapturedImage] {
        self.groups
            .iter()
            .find(|group| group.label == label)
            .map(|group| group.images.as_slice())
            .unwrap_or(&[])
    }

    /// Every pending image with its label, labels in first-capture order.
    pub fn pending(&self) -> impl Iterator<Item = (&str, &CapturedImage)> {
        self.groups.iter().flat_map(|group| {
            group
                .images
                .iter()
                .map(move |image| (group.label.as_str(), image))
        })
    }

    /// Labels that currently hold at least one image.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .filter(|group| !group.images.is_empty())
            .map(|group| group.label.as_str())
    }

    /// Keeps only the images for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &CapturedImage) -> bool,
    {
        for group in &mut self.groups {
            let label = group.label.as_str();
            group.images.retain(|image| keep(label, image));
        }
    }
}
