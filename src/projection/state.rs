//! Herd state: piglet batches tracked from conception to sale

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;

/// Sale status of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    /// Still in gestation, lactation or the grower window
    Unsold,
    /// Reached market weight, waiting for a sale month
    Ready,
    Sold,
}

/// One cohort of piglets conceived in the same month.
///
/// `piglets` is an expected count, not a head count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    /// 1-indexed in creation order
    pub id: u32,
    pub conception_month: u32,
    pub farrow_month: u32,
    pub wean_month: u32,
    pub grower_start_month: u32,
    /// First month the batch is at market weight
    pub grower_end_month: u32,
    pub piglets: f64,
    /// Grower feed in kg per month of the grower window
    pub grower_feed_per_month: f64,
    pub status: BatchStatus,
    pub sold_month: Option<u32>,
}

impl Batch {
    /// Schedule a batch conceived in `month` from the expected pregnant sow count
    pub fn conceived(id: u32, month: u32, pregnant_sows: f64, config: &SimulationConfig) -> Self {
        let timings = &config.timings;
        let farrow_month = month + timings.gestation_months;
        let wean_month = farrow_month + timings.lactation_months;
        let grower_start_month = wean_month;
        let grower_end_month = grower_start_month + timings.grower_months;

        let piglets = pregnant_sows * config.piglets_per_cycle * (1.0 - config.piglet_mortality);
        let grower_feed_per_month =
            piglets * config.fcr * config.final_weight / timings.grower_months as f64;

        Self {
            id,
            conception_month: month,
            farrow_month,
            wean_month,
            grower_start_month,
            grower_end_month,
            piglets,
            grower_feed_per_month,
            status: BatchStatus::Unsold,
            sold_month: None,
        }
    }

    pub fn is_lactating(&self, month: u32) -> bool {
        self.farrow_month <= month && month < self.wean_month
    }

    pub fn is_growing(&self, month: u32) -> bool {
        self.grower_start_month <= month && month < self.grower_end_month
    }

    pub fn is_sold(&self) -> bool {
        self.status == BatchStatus::Sold
    }
}

/// All batches created during one simulation run.
///
/// Batches are never removed; sold ones stay for end-of-run accounting.
#[derive(Debug, Clone, Default)]
pub struct Herd {
    batches: Vec<Batch>,
}

impl Herd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new batch and return it
    pub fn conceive(&mut self, month: u32, pregnant_sows: f64, config: &SimulationConfig) -> &Batch {
        let id = self.batches.len() as u32 + 1;
        self.batches.push(Batch::conceived(id, month, pregnant_sows, config));
        &self.batches[self.batches.len() - 1]
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn into_batches(self) -> Vec<Batch> {
        self.batches
    }

    /// Piglets still with their sows
    pub fn piglets_with_sow(&self, month: u32) -> f64 {
        self.batches.iter().filter(|b| b.is_lactating(month)).map(|b| b.piglets).sum()
    }

    /// Weaned pigs inside their grower window
    pub fn growers(&self, month: u32) -> f64 {
        self.batches.iter().filter(|b| b.is_growing(month)).map(|b| b.piglets).sum()
    }

    /// Grower feed required this month, in kg
    pub fn grower_feed_kg(&self, month: u32) -> f64 {
        self.batches
            .iter()
            .filter(|b| b.is_growing(month))
            .map(|b| b.grower_feed_per_month)
            .sum()
    }

    /// Move unsold batches that have reached market weight to `Ready`.
    /// Returns how many changed status.
    pub fn mark_ready(&mut self, month: u32) -> usize {
        let mut marked = 0;
        for batch in &mut self.batches {
            if batch.status == BatchStatus::Unsold && batch.grower_end_month <= month {
                batch.status = BatchStatus::Ready;
                marked += 1;
            }
        }
        marked
    }

    /// Sell every ready batch. Returns the number of pigs sold.
    pub fn sell_ready(&mut self, month: u32) -> f64 {
        let mut sold = 0.0;
        for batch in &mut self.batches {
            if batch.status == BatchStatus::Ready {
                batch.status = BatchStatus::Sold;
                batch.sold_month = Some(month);
                sold += batch.piglets;
            }
        }
        sold
    }

    pub fn total_born(&self) -> f64 {
        self.batches.iter().map(|b| b.piglets).sum()
    }

    pub fn total_sold(&self) -> f64 {
        self.batches.iter().filter(|b| b.is_sold()).map(|b| b.piglets).sum()
    }

    pub fn total_remaining(&self) -> f64 {
        self.batches.iter().filter(|b| !b.is_sold()).map(|b| b.piglets).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_batch_schedule() {
        let config = SimulationConfig::default();
        let batch = Batch::conceived(1, 2, 10.0, &config);

        assert_eq!(batch.farrow_month, 6);
        assert_eq!(batch.wean_month, 7);
        assert_eq!(batch.grower_start_month, 7);
        assert_eq!(batch.grower_end_month, 13);
        assert_relative_eq!(batch.piglets, 10.0 * 8.0 * 0.97, epsilon = 1e-12);
        assert_relative_eq!(
            batch.grower_feed_per_month,
            batch.piglets * 3.2 * 105.0 / 6.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_census_windows() {
        let config = SimulationConfig::default();
        let mut herd = Herd::new();
        let piglets = herd.conceive(2, 5.0, &config).piglets;

        assert_eq!(herd.piglets_with_sow(5), 0.0);
        assert_relative_eq!(herd.piglets_with_sow(6), piglets);
        assert_eq!(herd.piglets_with_sow(7), 0.0);

        assert_eq!(herd.growers(6), 0.0);
        assert_relative_eq!(herd.growers(7), piglets);
        assert_relative_eq!(herd.growers(12), piglets);
        assert_eq!(herd.growers(13), 0.0);
        assert_eq!(herd.grower_feed_kg(13), 0.0);
    }

    #[test]
    fn test_ready_batches_are_sold_once() {
        let config = SimulationConfig::default();
        let mut herd = Herd::new();
        herd.conceive(2, 5.0, &config);
        herd.conceive(3, 5.0, &config);

        assert_eq!(herd.mark_ready(12), 0);
        assert_eq!(herd.mark_ready(13), 1);
        // Already ready, not counted again
        assert_eq!(herd.mark_ready(13), 0);

        let sold = herd.sell_ready(13);
        assert_relative_eq!(sold, herd.batches()[0].piglets);
        assert_eq!(herd.sell_ready(13), 0.0);
        assert_eq!(herd.batches()[0].sold_month, Some(13));

        assert_relative_eq!(herd.total_born(), herd.total_sold() + herd.total_remaining());
    }
}
