//! Test helper utilities for generating synthetic I/Q captures

use std::f32::consts::PI;

/// Encode normalized interleaved values as unsigned 8-bit samples
pub fn to_u8(values: &[f32]) -> Vec<u8> {
    values
        .iter()
        .map(|v| (v * 128.0 + 128.0).round().clamp(0.0, 255.0) as u8)
        .collect()
}

/// Encode normalized interleaved values as signed 16-bit little-endian samples
pub fn to_i16(values: &[f32]) -> Vec<u8> {
    values
        .iter()
        .flat_map(|v| ((v * 32767.0).clamp(-32768.0, 32767.0) as i16).to_le_bytes())
        .collect()
}

/// Generate a complex carrier offset from the centre frequency
///
/// # Arguments
/// * `frequency` - Offset in Hz
/// * `amplitude` - Peak amplitude in [0, 1]
/// * `sample_rate` - Sample rate in Hz
/// * `num_samples` - Number of I/Q pairs to generate
///
/// # Returns
/// Normalized interleaved I/Q values
pub fn carrier(frequency: f32, amplitude: f32, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    let angular_freq = 2.0 * PI * frequency / sample_rate as f32;
    let mut buffer = Vec::with_capacity(num_samples * 2);
    for n in 0..num_samples {
        let phase = (angular_freq * n as f32) % (2.0 * PI);
        buffer.push(amplitude * phase.cos());
        buffer.push(amplitude * phase.sin());
    }
    buffer
}

/// Generate an AM carrier at 0 Hz modulated by a single tone
///
/// # Arguments
/// * `tone` - Modulating tone in Hz
/// * `depth` - Modulation depth in [0, 1]
/// * `sample_rate` - Sample rate in Hz
/// * `num_samples` - Number of I/Q pairs to generate
pub fn am_tone(tone: f32, depth: f32, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    let mut buffer = Vec::with_capacity(num_samples * 2);
    for n in 0..num_samples {
        let t = n as f32 / sample_rate as f32;
        let envelope = 0.4 * (1.0 + depth * (2.0 * PI * tone * t).sin());
        buffer.push(envelope);
        buffer.push(0.0);
    }
    buffer
}

/// Generate an FM carrier at 0 Hz modulated by a single tone
///
/// # Arguments
/// * `tone` - Modulating tone in Hz
/// * `deviation` - Peak frequency deviation in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `num_samples` - Number of I/Q pairs to generate
pub fn fm_tone(tone: f32, deviation: f32, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    let mut buffer = Vec::with_capacity(num_samples * 2);
    let mut phase = 0.0f32;
    for n in 0..num_samples {
        let t = n as f32 / sample_rate as f32;
        let freq = deviation * (2.0 * PI * tone * t).sin();
        phase = (phase + 2.0 * PI * freq / sample_rate as f32) % (2.0 * PI);
        buffer.push(0.7 * phase.cos());
        buffer.push(0.7 * phase.sin());
    }
    buffer
}

/// Generate a broadcast FM stereo carrier with a tone on the left channel only
///
/// The multiplex carries L+R, a 19 kHz pilot at 10 % and L-R on the 38 kHz
/// subcarrier, and is modulated with 75 kHz peak deviation.
///
/// # Arguments
/// * `tone` - Left channel tone in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `num_samples` - Number of I/Q pairs to generate
pub fn fm_stereo_left_tone(tone: f32, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    let mut buffer = Vec::with_capacity(num_samples * 2);
    let mut phase = 0.0f32;
    for n in 0..num_samples {
        let t = n as f32 / sample_rate as f32;
        let left = 0.4 * (2.0 * PI * tone * t).sin();
        let pilot_phase = 2.0 * PI * 19_000.0 * t;
        let mpx = 0.45 * left + 0.1 * pilot_phase.sin() + 0.45 * left * (2.0 * pilot_phase).sin();
        phase = (phase + 2.0 * PI * 75_000.0 * mpx / sample_rate as f32) % (2.0 * PI);
        buffer.push(0.7 * phase.cos());
        buffer.push(0.7 * phase.sin());
    }
    buffer
}

/// Decode little-endian 16-bit PCM
pub fn pcm_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect()
}

/// Peak absolute value of a PCM slice
pub fn peak(samples: &[i16]) -> i32 {
    samples.iter().map(|&s| (s as i32).abs()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_u8_centre() {
        assert_eq!(to_u8(&[0.0, 0.0]), vec![128, 128]);
        assert_eq!(to_u8(&[-1.0, 1.0]), vec![0, 255]);
    }

    #[test]
    fn test_to_i16_length() {
        let bytes = to_i16(&carrier(1000.0, 0.5, 96_000, 100));
        assert_eq!(bytes.len(), 400); // 100 pairs * 2 values * 2 bytes
    }

    #[test]
    fn test_carrier_at_dc() {
        let values = carrier(0.0, 0.5, 96_000, 10);
        for pair in values.chunks_exact(2) {
            assert_eq!(pair, &[0.5, 0.0]);
        }
    }

    #[test]
    fn test_pcm_samples() {
        assert_eq!(pcm_samples(&[0x01, 0x00, 0xff, 0xff, 0x07]), vec![1, -1]);
        assert_eq!(peak(&[3, -7, 5]), 7);
    }
}
