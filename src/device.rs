//! Output device discovery.

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::SupportedStreamConfig;
use tracing::debug;

use crate::error::InitError;
use crate::nodes::sink::CpalSink;

/// An output device paired with the stream config we would open it with.
pub struct OutputDevice {
    device: cpal::Device,
    config: SupportedStreamConfig,
}

impl OutputDevice {
    /// The host's default output device with its default config.
    pub fn default_output() -> Result<Self, InitError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(InitError::NoOutputDevice)?;
        let config = device
            .default_output_config()
            .map_err(|e| InitError::UnsupportedConfig(e.to_string()))?;
        let found = Self { device, config };
        debug!(
            name = %found.name(),
            sample_rate = found.sample_rate(),
            channels = found.channels(),
            "acquired default output device"
        );
        Ok(found)
    }

    /// Every output device the host can enumerate.
    ///
    /// Devices whose default config cannot be queried are skipped.
    pub fn list_outputs() -> Vec<Self> {
        let host = cpal::default_host();
        let Ok(devices) = host.output_devices() else {
            return Vec::new();
        };
        devices
            .filter_map(|device| {
                let config = device.default_output_config().ok()?;
                Some(Self { device, config })
            })
            .collect()
    }

    pub fn name(&self) -> String {
        self.device.name().unwrap_or_else(|_| "<unknown>".into())
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate().0
    }

    #[inline]
    pub fn channels(&self) -> u16 {
        self.config.channels()
    }

    /// Open the device and start its output stream.
    pub fn create_sink(&self) -> Result<CpalSink, InitError> {
        CpalSink::new(&self.device, &self.config)
    }
}
