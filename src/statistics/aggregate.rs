use ordered_float::OrderedFloat;

impl<T> Aggregate for T where T: ?Sized {}

pub trait Aggregate {
    /// Median, averaging the two middle values for even-sized samples.
    #[must_use]
    fn median(self) -> Option<f64>
    where
        Self: Sized + Iterator<Item = f64>,
    {
        let mut values: Vec<f64> = self.collect();
        if values.is_empty() {
            None
        } else {
            values.sort_unstable_by_key(|value| OrderedFloat(*value));
            let index = values.len() / 2;
            if values.len() % 2 == 1 {
                Some(values[index])
            } else {
                Some((values[index - 1] + values[index]) / 2.0)
            }
        }
    }
}
