use burn::tensor::{backend::Backend, Tensor};

use crate::{artifacts::ConfigurationError, features::FeatureVector, utils::tensors};

use super::Label;

/// Binary logistic-regression weights, as exported from the training run
#[derive(burn::config::Config, Debug)]
pub struct ClassifierConfig {
    /// One weight per feature column
    pub coef: Vec<f32>,

    /// Bias added to every decision
    #[config(default = 0.0)]
    pub intercept: f32,

    /// Class ids for a non-positive and a positive decision, in that order
    #[config(default = "vec![0, 1]")]
    pub classes: Vec<i64>,
}

impl ClassifierConfig {
    /// The number of feature columns the weights expect
    pub fn dim(&self) -> usize {
        self.coef.len()
    }

    /// Validate the weights and load them onto the device
    pub fn init<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Result<LinearClassifier<B>, ConfigurationError> {
        let classes: [i64; 2] = self
            .classes
            .as_slice()
            .try_into()
            .map_err(|_| ConfigurationError::Classes(self.classes.len()))?;

        if self.coef.iter().any(|weight| !weight.is_finite()) {
            return Err(ConfigurationError::NonFinite("classifier weights"));
        }

        if !self.intercept.is_finite() {
            return Err(ConfigurationError::NonFinite("classifier intercept"));
        }

        Ok(LinearClassifier {
            weights: tensors::column(&self.coef, device),
            dim: self.dim(),
            intercept: self.intercept,
            classes,
            device: device.clone(),
        })
    }
}

/// A linear classifier over TF-IDF features.
///
/// The decision for a row `x` is `x·coef + intercept`; a strictly positive decision selects the
/// second class. Weights are immutable once loaded.
#[derive(Debug)]
pub struct LinearClassifier<B: Backend> {
    weights: Tensor<B, 2>,
    dim: usize,
    intercept: f32,
    classes: [i64; 2],
    device: B::Device,
}

impl<B: Backend> LinearClassifier<B> {
    /// The number of feature columns the weights expect
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Decision values for a batch, computed as one `[batch, dim] × [dim, 1]` product.
    ///
    /// # Panics
    ///
    /// If a row's dimension differs from [`LinearClassifier::dim`].
    pub fn decision_batch(&self, rows: &[FeatureVector]) -> Vec<f32> {
        if rows.is_empty() {
            return Vec::new();
        }

        assert!(
            rows.iter().all(|row| row.dim() == self.dim),
            "feature vectors must have {} columns",
            self.dim
        );

        let input = tensors::stack_rows::<B>(rows, self.dim, &self.device);
        let output = input
            .matmul(self.weights.clone())
            .add_scalar(self.intercept);

        tensors::to_vec(output)
    }

    /// The signed distance of one row from the decision boundary
    pub fn decision_function(&self, features: &FeatureVector) -> f32 {
        self.decision_batch(std::slice::from_ref(features))
            .first()
            .copied()
            .unwrap_or(self.intercept)
    }

    /// The probability of the second class, the logistic sigmoid of the decision
    pub fn probability(&self, features: &FeatureVector) -> f32 {
        sigmoid(self.decision_function(features))
    }

    /// The class id selected by a decision value
    pub fn class_for(&self, decision: f32) -> i64 {
        if decision > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        }
    }

    /// Predict the label of one row
    pub fn predict(&self, features: &FeatureVector) -> Label {
        Label::from_class(self.class_for(self.decision_function(features)))
    }

    /// Predict the labels of a batch, in order
    pub fn predict_batch(&self, rows: &[FeatureVector]) -> Vec<Label> {
        self.decision_batch(rows)
            .into_iter()
            .map(|decision| Label::from_class(self.class_for(decision)))
            .collect()
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + libm::expf(-x))
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;
    use pretty_assertions::assert_eq;

    use super::*;

    type TestBackend = NdArray;

    fn classifier(config: ClassifierConfig) -> LinearClassifier<TestBackend> {
        config
            .init::<TestBackend>(&Default::default())
            .expect("valid classifier config")
    }

    #[test]
    fn decision_is_dot_product_plus_intercept() {
        let model = classifier(ClassifierConfig::new(vec![2.0, -1.0, 0.5]).with_intercept(0.25));

        let decision = model.decision_function(&vec![1.0, 2.0, 4.0].into());

        assert!((decision - 2.25).abs() < 1e-6);
    }

    #[test]
    fn positive_decision_selects_the_second_class() {
        let model = classifier(ClassifierConfig::new(vec![1.0, -1.0]));

        assert_eq!(model.predict(&vec![1.0, 0.0].into()), Label::Positive);
        assert_eq!(model.predict(&vec![0.0, 1.0].into()), Label::Negative);

        // exactly on the boundary is not positive
        assert_eq!(model.predict(&vec![1.0, 1.0].into()), Label::Negative);
    }

    #[test]
    fn zero_vector_follows_the_intercept() {
        let zeros = FeatureVector::zeros(2);

        let positive = classifier(ClassifierConfig::new(vec![1.0, 1.0]).with_intercept(0.5));
        let negative = classifier(ClassifierConfig::new(vec![1.0, 1.0]).with_intercept(-0.5));
        let neutral = classifier(ClassifierConfig::new(vec![1.0, 1.0]));

        assert_eq!(positive.predict(&zeros), Label::Positive);
        assert_eq!(negative.predict(&zeros), Label::Negative);
        assert_eq!(neutral.predict(&zeros), Label::Negative);
    }

    #[test]
    fn custom_classes_map_through_class_one() {
        let model = classifier(ClassifierConfig::new(vec![1.0]).with_classes(vec![1, 4]));

        // a negative decision picks class 1, which is the positive label
        assert_eq!(model.predict(&vec![-1.0].into()), Label::Positive);
        assert_eq!(model.predict(&vec![1.0].into()), Label::Negative);
    }

    #[test]
    fn batch_matches_single_predictions() {
        let model = classifier(ClassifierConfig::new(vec![1.0, -2.0]).with_intercept(0.1));
        let rows: Vec<FeatureVector> = vec![
            vec![1.0, 0.0].into(),
            vec![0.0, 1.0].into(),
            vec![0.0, 0.0].into(),
            vec![3.0, 1.0].into(),
        ];

        let batch = model.predict_batch(&rows);
        let single = rows.iter().map(|row| model.predict(row)).collect::<Vec<_>>();

        assert_eq!(batch, single);
        assert_eq!(
            batch,
            vec![
                Label::Positive,
                Label::Negative,
                Label::Positive,
                Label::Positive
            ]
        );
        assert!(model.predict_batch(&[]).is_empty());
    }

    #[test]
    fn probability_is_the_sigmoid_of_the_decision() {
        let model = classifier(ClassifierConfig::new(vec![1.0]));

        assert!((model.probability(&vec![0.0].into()) - 0.5).abs() < 1e-6);
        assert!(model.probability(&vec![4.0].into()) > 0.98);
        assert!(model.probability(&vec![-4.0].into()) < 0.02);
    }

    #[test]
    fn rejects_invalid_weights() {
        let device = Default::default();

        assert!(matches!(
            ClassifierConfig::new(vec![1.0])
                .with_classes(vec![0, 1, 2])
                .init::<TestBackend>(&device),
            Err(ConfigurationError::Classes(3))
        ));
        assert!(matches!(
            ClassifierConfig::new(vec![f32::INFINITY]).init::<TestBackend>(&device),
            Err(ConfigurationError::NonFinite(_))
        ));
    }
}
