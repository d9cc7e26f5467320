//! The injected hardware capability set (§6, §9 redesign flag).
//!
//! The core never reaches for process-global radio/IR/backscatter/RIS
//! facades; instead one object implementing [`Hal`] is passed to
//! `Engine::new`. Outcome classification (pass/fail per attempt) is *not*
//! a HAL concern — the engine applies its own channel model to a probed
//! SNR; the HAL only performs the primitive physical action and reports
//! instrument readings (RSSI, duty-left hint).

/// Opaque primitive operations a physical (or simulated) radio/IR/
/// backscatter/RIS stack exposes (§6).
pub trait Hal {
    /// One-time radio bring-up.
    fn radio_init(&mut self);

    /// Configure the LoRa-style RF front end.
    fn lora_cfg(&mut self, freq_hz: u64, bw_khz: u32, sf: u8, cr: u8, preamble_sym: u32);

    /// Transmit one RF packet.
    fn lora_tx(&mut self, bytes: &[u8]);

    /// Instantaneous received signal strength, in dBm.
    fn lora_rssi(&mut self) -> f64;

    /// Continuous-wave carrier on, for `seconds`.
    fn cw_on(&mut self, seconds: f64);

    /// Continuous-wave carrier off.
    fn cw_off(&mut self);

    /// Transmit over the optical/IR link.
    fn ir_tx(&mut self, bytes: &[u8], bitrate_bps: u32);

    /// Modulate ambient backscatter bits.
    fn bs_modulate(&mut self, bits: &[u8], bitrate_bps: u32);

    /// Set the reconfigurable-surface tile phases; each byte's low 2 bits
    /// encode one tile's phase quadrant.
    fn ris_set_phases(&mut self, phases: &[u8]);

    /// Next FHSS carrier frequency given a salt byte.
    fn fhss_next(&mut self, salt: u8) -> u64;

    /// Remaining duty-cycle headroom, in `[0, 1]`.
    fn duty_left_hint(&mut self) -> f64;
}
