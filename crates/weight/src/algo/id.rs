use crate::errors::{WeightError, WeightResult};

/// Hands out sequential ids, starting at 1.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct IdDispatcher {
    current_id: u32,
}

impl IdDispatcher {
    pub(crate) const fn new() -> Self {
        Self { current_id: 0 }
    }

    pub(crate) fn gen_id(&mut self) -> WeightResult<u32> {
        self.current_id = self
            .current_id
            .checked_add(1)
            .ok_or(WeightError::IdsExhausted)?;
        Ok(self.current_id)
    }

    pub(crate) fn reset(&mut self) {
        self.current_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_and_resettable() {
        let mut dispatcher = IdDispatcher::new();
        assert_eq!(dispatcher.gen_id(), Ok(1));
        assert_eq!(dispatcher.gen_id(), Ok(2));
        dispatcher.reset();
        assert_eq!(dispatcher.gen_id(), Ok(1));
    }

    #[test]
    fn test_exhausted_ids_fail() {
        let mut dispatcher = IdDispatcher {
            current_id: u32::MAX,
        };
        assert_eq!(dispatcher.gen_id(), Err(WeightError::IdsExhausted));
    }
}
