/// Avalanche hash of the frame counter; decorrelates neighbouring frames.
pub fn hash_frame(frame: u32) -> u32 {
    let mut a = (frame ^ 61) ^ (frame >> 16);
    a = a.wrapping_add(a << 3);
    a ^= a >> 4;
    a = a.wrapping_mul(0x27d4_eb2d);
    a ^ (a >> 15)
}

/// Use this to turn a user supplied seed into xorshift state
pub fn splitmix_64(state: &mut u64) -> u64 {
    *state = (*state).wrapping_add(0x9E3779B97F4A7C15);
    let mut result = *state;
    result = (result ^ (result >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    result = (result ^ (result >> 27)).wrapping_mul(0x94D049BB133111EB);
    result ^ (result >> 31)
}

/// Deterministic xorshift stream producing the per-frame kernel seeds.
#[derive(Debug, Clone)]
pub struct SeedStream {
    state: u32,
}

impl SeedStream {
    pub fn new(seed: u64) -> Self {
        let mut mix = seed;
        let state = (splitmix_64(&mut mix) >> 32) as u32;
        // xorshift is stuck at zero
        Self {
            state: if state == 0 { 0x9E37_79B9 } else { state },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }
}
