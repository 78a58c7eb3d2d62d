/// Engine time in seconds.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn seconds(self) -> f64 {
        self.0
    }

    pub fn advanced_by(self, dt_s: f64) -> Self {
        Time(self.0 + dt_s)
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn advancing_accumulates_seconds() {
        let t = Time::ZERO.advanced_by(0.25).advanced_by(0.5);
        assert_eq!(t.seconds(), 0.75);
        assert!(Time::ZERO < t);
    }
}
