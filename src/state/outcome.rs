/// How a picker session ends
///
/// Every session reports exactly one outcome to the host, through a
/// one-shot channel created alongside the coordinator.

use image::DynamicImage;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Final result of a filter picker session
#[derive(Debug, Clone)]
pub enum FilterOutcome {
    /// The user backed out; carries the untouched original
    Cancelled(Arc<DynamicImage>),
    /// The selected filter failed on the full-resolution image; carries the original
    Failed(Arc<DynamicImage>),
    /// The selected filter was applied to the full-resolution image
    Filtered(Arc<DynamicImage>),
}

impl FilterOutcome {
    /// The image carried by this outcome
    pub fn image(&self) -> &Arc<DynamicImage> {
        match self {
            FilterOutcome::Cancelled(image)
            | FilterOutcome::Failed(image)
            | FilterOutcome::Filtered(image) => image,
        }
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self, FilterOutcome::Filtered(_))
    }
}

/// Host side of the outcome channel
pub type OutcomeReceiver = oneshot::Receiver<FilterOutcome>;

/// Coordinator side of the outcome channel
///
/// Sending consumes the sender, so a second outcome cannot be delivered.
#[derive(Debug)]
pub struct OutcomeSender(Option<oneshot::Sender<FilterOutcome>>);

impl OutcomeSender {
    pub fn channel() -> (Self, OutcomeReceiver) {
        let (tx, rx) = oneshot::channel();
        (Self(Some(tx)), rx)
    }

    /// Deliver the outcome; returns false if one was already delivered
    pub fn send(&mut self, outcome: FilterOutcome) -> bool {
        match self.0.take() {
            Some(tx) => {
                // The host may have dropped its receiver; that is not our failure
                if tx.send(outcome).is_err() {
                    log::debug!("📭 Outcome receiver was dropped before delivery");
                }
                true
            }
            None => false,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.0.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::testing::solid;

    #[test]
    fn test_only_first_outcome_is_delivered() {
        let (mut tx, mut rx) = OutcomeSender::channel();
        let image = Arc::new(solid(2, 2, [0, 0, 0, 255]));

        assert!(tx.send(FilterOutcome::Cancelled(image.clone())));
        assert!(!tx.send(FilterOutcome::Filtered(image)));
        assert!(tx.is_spent());

        assert!(matches!(rx.try_recv(), Ok(FilterOutcome::Cancelled(_))));
    }

    #[test]
    fn test_dropped_receiver_still_spends_sender() {
        let (mut tx, rx) = OutcomeSender::channel();
        drop(rx);

        assert!(tx.send(FilterOutcome::Failed(Arc::new(solid(1, 1, [0; 4])))));
        assert!(tx.is_spent());
    }
}
