//! Board bindings for the core's analog traits
//!
//! The four flex sensors sit on the RP2040's ADC-capable pins (GPIO
//! 26-29); the servo signal comes from a PWM slice configured for the
//! 50 Hz servo frame.

use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use fixed::traits::ToFixed;

use dactyl_core::motion::DUTY_MAX_TICKS;
use dactyl_core::sensor::ADC_PIN_MIN;
use dactyl_core::traits::{AnalogReader, PwmWriter};

use defmt::warn;

/// PWM counter ticks per 20 ms servo frame (2 us per tick at divider 250)
const PWM_TOP: u16 = 9999;

/// System clock divider giving the 2 us PWM tick
const PWM_DIVIDER: u32 = 250;

/// ADC access for the four sensor pins
pub struct BoardAdc {
    adc: Adc<'static, Blocking>,
    // Index = GPIO - 26
    channels: [Channel<'static>; 4],
}

impl BoardAdc {
    pub fn new(adc: Adc<'static, Blocking>, channels: [Channel<'static>; 4]) -> Self {
        Self { adc, channels }
    }
}

impl AnalogReader for BoardAdc {
    fn read(&mut self, pin: u8) -> u16 {
        let Some(channel) = self
            .channels
            .get_mut(pin.wrapping_sub(ADC_PIN_MIN) as usize)
        else {
            warn!("ADC read on non-ADC pin {}", pin);
            return 0;
        };
        match self.adc.blocking_read(channel) {
            Ok(raw) => raw,
            Err(_) => {
                warn!("ADC conversion error on pin {}", pin);
                0
            }
        }
    }
}

/// 50 Hz servo frame configuration for a PWM slice
pub fn servo_pwm_config() -> PwmConfig {
    let mut config = PwmConfig::default();
    config.divider = PWM_DIVIDER.to_fixed();
    config.top = PWM_TOP;
    config.compare_a = 0;
    config
}

/// Servo PWM output
///
/// The slice/pin pairing is fixed by board wiring, so the pin argument of
/// the trait is informational here; a servo `PIN` attribute change updates
/// the controller's bookkeeping only.
pub struct BoardPwm {
    pwm: Pwm<'static>,
    config: PwmConfig,
}

impl BoardPwm {
    pub fn new(pwm: Pwm<'static>) -> Self {
        Self {
            pwm,
            config: servo_pwm_config(),
        }
    }
}

impl PwmWriter for BoardPwm {
    fn write(&mut self, _pin: u8, duty: u32) {
        let level = duty * (PWM_TOP as u32 + 1) / (DUTY_MAX_TICKS + 1);
        self.config.compare_a = level as u16;
        self.pwm.set_config(&self.config);
    }
}
