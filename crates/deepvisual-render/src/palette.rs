use deepvisual_graph::ClusterAssignment;

/// Edge colors for a plan: the cluster color when a relation has a cluster label, the plain
/// edge color otherwise.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale<'a> {
    palette: &'a [String],
    fallback: &'a str,
    clusters: Option<&'a ClusterAssignment>,
}

impl<'a> ColorScale<'a> {
    pub fn new(palette: &'a [String], fallback: &'a str) -> Self {
        Self {
            palette,
            fallback,
            clusters: None,
        }
    }

    pub fn with_clusters(mut self, clusters: Option<&'a ClusterAssignment>) -> Self {
        self.clusters = clusters;
        self
    }

    /// `palette[label % palette.len()]`; distinct clusters share a color once the palette runs
    /// out.
    pub fn color_for_label(&self, label: usize) -> &'a str {
        if self.palette.is_empty() {
            return self.fallback;
        }
        &self.palette[label % self.palette.len()]
    }

    pub fn color_for(&self, relation_id: u32) -> &'a str {
        match self.clusters.and_then(|c| c.label_of(relation_id)) {
            Some(label) => self.color_for_label(label),
            None => self.fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ColorScale;

    #[test]
    fn labels_wrap_around_the_palette() {
        let palette = vec!["red".to_string(), "blue".to_string()];
        let scale = ColorScale::new(&palette, "gray");
        assert_eq!(scale.color_for_label(0), "red");
        assert_eq!(scale.color_for_label(1), "blue");
        assert_eq!(scale.color_for_label(2), "red");
    }

    #[test]
    fn unclustered_relations_use_the_fallback() {
        let palette = vec!["red".to_string()];
        let scale = ColorScale::new(&palette, "gray");
        assert_eq!(scale.color_for(7), "gray");
    }

    #[test]
    fn empty_palette_falls_back() {
        let scale = ColorScale::new(&[], "gray");
        assert_eq!(scale.color_for_label(3), "gray");
    }
}
