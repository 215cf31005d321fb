//! Butterworth lowpass/highpass filtering.

use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz, Type, Q_BUTTERWORTH_F32};
use dasp_graph::{Buffer, Input};

use crate::node::{AudioNode, ProcessContext};

/// Which half of the spectrum the filter keeps.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FilterMode {
    Lowpass,
    Highpass,
}

/// Control messages for [`BiquadFilter`].
#[derive(Clone, Copy, Debug)]
pub enum FilterMessage {
    /// Move the cutoff. Coefficients are rebuilt before the next block;
    /// filter state carries over, so sweeps stay click-free.
    SetCutoff(f32),
}

/// Single second-order Butterworth section (12 dB/oct).
///
/// The filter needs the output sample rate to derive its coefficients, and
/// that is only known once the node is processed inside a graph, so the inner
/// biquad is built lazily on the first block.
pub struct BiquadFilter {
    mode: FilterMode,
    cutoff_hz: f32,
    inner: Option<DirectForm2Transposed<f32>>,
}

impl BiquadFilter {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            mode: FilterMode::Lowpass,
            cutoff_hz,
            inner: None,
        }
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self {
            mode: FilterMode::Highpass,
            cutoff_hz,
            inner: None,
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    fn rebuild(&mut self, sample_rate: u32) {
        let filter_type = match self.mode {
            FilterMode::Lowpass => Type::LowPass,
            FilterMode::Highpass => Type::HighPass,
        };
        // Keep the cutoff below Nyquist; from_params rejects it otherwise
        let cutoff = self.cutoff_hz.clamp(1.0, sample_rate as f32 * 0.45);
        let coefficients = Coefficients::<f32>::from_params(
            filter_type,
            (sample_rate as f32).hz(),
            cutoff.hz(),
            Q_BUTTERWORTH_F32,
        );
        if let Ok(c) = coefficients {
            match self.inner.as_mut() {
                // update_coefficients preserves z1/z2 across the change
                Some(filter) => filter.update_coefficients(c),
                None => self.inner = Some(DirectForm2Transposed::<f32>::new(c)),
            }
        }
    }
}

impl AudioNode for BiquadFilter {
    type Message = FilterMessage;

    fn process(
        &mut self,
        ctx: &ProcessContext,
        messages: impl Iterator<Item = FilterMessage>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        let mut dirty = self.inner.is_none();
        for FilterMessage::SetCutoff(cutoff_hz) in messages {
            self.cutoff_hz = cutoff_hz;
            dirty = true;
        }
        if dirty {
            self.rebuild(ctx.sample_rate);
        }

        let Some(out) = outputs.first_mut() else {
            return;
        };

        let input = inputs.first().and_then(|input| input.buffers().first());
        let (Some(input), Some(filter)) = (input, self.inner.as_mut()) else {
            out.silence();
            return;
        };

        for (sample, &in_sample) in out.iter_mut().zip(input.iter()) {
            *sample = filter.run(in_sample);
        }
    }

    #[inline]
    fn num_inputs(&self) -> usize {
        1
    }

    #[inline]
    fn num_outputs(&self) -> usize {
        1
    }
}
