use crate::math::{hash_frame, SeedStream};

/// Outcome of advancing the frame controller by one rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Frame number handed to the kernel, `1` on the first frame after a reset
    pub number: u32,
    /// The accumulation buffer must be cleared before this frame is dispatched
    pub clear_accumulation: bool,
}

/// Random inputs for one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSeeds {
    pub seed_a: u32,
    pub seed_b: u32,
    pub frame_hash: u32,
}

/// Progressive accumulation state.
///
/// Two states: steady (accumulating) and reset-pending. Any camera or scene change
/// calls [`FrameController::request_reset`]; the next [`FrameController::advance`]
/// consumes the request, restarts the count at zero and increments it in the same
/// step, so the counter and the accumulation buffer never disagree.
#[derive(Debug, Clone)]
pub struct FrameController {
    frame_number: u32,
    reset_requested: bool,
    seeds: SeedStream,
}

impl FrameController {
    /// Starts reset-pending so the first frame clears whatever the buffer holds.
    pub fn new(seed: u64) -> Self {
        Self {
            frame_number: 0,
            reset_requested: true,
            seeds: SeedStream::new(seed),
        }
    }

    pub fn frame_number(&self) -> u32 {
        self.frame_number
    }

    pub fn is_reset_pending(&self) -> bool {
        self.reset_requested
    }

    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    pub fn advance(&mut self) -> FrameTick {
        let clear_accumulation = self.reset_requested;
        if clear_accumulation {
            self.frame_number = 0;
        }
        self.reset_requested = false;
        self.frame_number = self.frame_number.wrapping_add(1);

        FrameTick {
            number: self.frame_number,
            clear_accumulation,
        }
    }

    /// Two fresh stream values plus the hash of the current frame number
    pub fn next_seeds(&mut self) -> FrameSeeds {
        FrameSeeds {
            seed_a: self.seeds.next_u32(),
            seed_b: self.seeds.next_u32(),
            frame_hash: hash_frame(self.frame_number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_clears() {
        let mut frames = FrameController::new(0);
        let tick = frames.advance();
        assert!(tick.clear_accumulation);
        assert_eq!(tick.number, 1);
        assert!(!frames.is_reset_pending());
    }

    #[test]
    fn test_counter_wraps() {
        let mut frames = FrameController::new(0);
        frames.advance();
        frames.frame_number = u32::MAX;
        assert_eq!(frames.advance().number, 0);
    }

    #[test]
    fn test_seeds_use_hashed_frame_number() {
        let mut frames = FrameController::new(3);
        frames.advance();
        frames.advance();
        let seeds = frames.next_seeds();
        assert_eq!(seeds.frame_hash, hash_frame(2));
        assert_ne!(seeds.seed_a, seeds.seed_b);
    }
}
