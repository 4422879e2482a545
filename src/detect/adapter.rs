use anyhow::{Context, Result};

use crate::detect::backend::DetectorBackend;
use crate::detect::result::Detection;
use crate::detect::vocabulary::ClassAllowList;
use crate::frame::Frame;

/// Detector adapter: restricts a backend to a set of labels and runs it per frame.
pub struct ObjectDetector {
    backend: Box<dyn DetectorBackend>,
}

impl ObjectDetector {
    pub fn new<B: DetectorBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn from_boxed(backend: Box<dyn DetectorBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Class indices for `labels`; labels the model does not know are left out.
    pub fn allow_list<'a, I>(&self, labels: I) -> ClassAllowList
    where
        I: IntoIterator<Item = &'a str>,
    {
        ClassAllowList::from_labels(labels, self.backend.vocabulary())
    }

    pub fn warm_up(&mut self) -> Result<()> {
        self.backend
            .warm_up()
            .with_context(|| format!("warm-up of '{}' backend failed", self.backend.name()))
    }

    /// Detect objects of the allowed labels. Results are not confidence filtered.
    pub fn detect<'a, I>(&mut self, frame: &Frame, allowed_labels: I) -> Result<Vec<Detection>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let allow = self.allow_list(allowed_labels);
        self.detect_with(frame, &allow)
    }

    /// Detect with a prebuilt allow-list.
    pub fn detect_with(&mut self, frame: &Frame, allow: &ClassAllowList) -> Result<Vec<Detection>> {
        if allow.is_empty() {
            return Ok(Vec::new());
        }
        self.backend
            .detect(frame, allow)
            .with_context(|| format!("'{}' inference failed", self.backend.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::result::BoundingBox;
    use crate::detect::vocabulary::Vocabulary;
    use anyhow::anyhow;

    struct FailingBackend {
        vocabulary: Vocabulary,
    }

    impl DetectorBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn vocabulary(&self) -> &Vocabulary {
            &self.vocabulary
        }

        fn detect(&mut self, _frame: &Frame, _allow: &ClassAllowList) -> Result<Vec<Detection>> {
            Err(anyhow!("model crashed"))
        }
    }

    struct EchoBackend {
        vocabulary: Vocabulary,
        seen: Vec<Vec<usize>>,
    }

    impl DetectorBackend for EchoBackend {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn vocabulary(&self) -> &Vocabulary {
            &self.vocabulary
        }

        fn detect(&mut self, _frame: &Frame, allow: &ClassAllowList) -> Result<Vec<Detection>> {
            self.seen.push(allow.indices().collect());
            Ok(allow
                .indices()
                .map(|idx| {
                    let label = self.vocabulary.name(idx).unwrap_or_default().to_string();
                    Detection::new(label, idx, 0.3, BoundingBox::new(0, 0, 1, 1))
                })
                .collect())
        }
    }

    #[test]
    fn inference_failure_propagates() {
        let mut detector = ObjectDetector::new(FailingBackend {
            vocabulary: Vocabulary::coco(),
        });
        let err = detector
            .detect(&Frame::new(8, 8), ["person"])
            .unwrap_err();
        assert!(format!("{err:#}").contains("model crashed"));
    }

    #[test]
    fn allow_list_skips_labels_missing_from_vocabulary() {
        let detector = ObjectDetector::new(EchoBackend {
            vocabulary: Vocabulary::new(["person", "chair", "laptop"]),
            seen: Vec::new(),
        });
        let allow = detector.allow_list(["person", "chair", "laptop", "book"]);
        assert_eq!(allow.indices().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn low_confidence_results_are_passed_through() {
        let mut detector = ObjectDetector::new(EchoBackend {
            vocabulary: Vocabulary::coco(),
            seen: Vec::new(),
        });
        let detections = detector
            .detect(&Frame::new(8, 8), ["book", "unicorn"])
            .unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].label, "book");
        assert_eq!(detections[0].confidence, 0.3);
    }

    #[test]
    fn empty_allow_list_skips_inference() {
        let mut detector = ObjectDetector::new(FailingBackend {
            vocabulary: Vocabulary::coco(),
        });
        let detections = detector.detect(&Frame::new(8, 8), ["unicorn"]).unwrap();
        assert!(detections.is_empty());
    }
}
