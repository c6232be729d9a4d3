use crate::foundation::error::{BandwaveError, BandwaveResult};

/// One timeline tick: its time, pixel column and `M:SS` label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tick {
    pub secs: u32,
    pub x: u32,
    pub label: String,
}

/// Ticks every `interval_secs` from zero up to and including `duration_secs`.
///
/// A timeline needing more intervals than it has columns is degenerate, which keeps the tick
/// count at most `width + 1`.
pub fn ticks(duration_secs: f64, interval_secs: u32, width: u32) -> BandwaveResult<Vec<Tick>> {
    check_duration(duration_secs)?;
    if interval_secs == 0 {
        return Err(BandwaveError::degenerate("tick interval must be > 0"));
    }
    if width == 0 {
        return Err(BandwaveError::degenerate("timeline width must be > 0"));
    }
    if duration_secs / f64::from(interval_secs) > f64::from(width) {
        return Err(BandwaveError::degenerate(format!(
            "{duration_secs} s needs more {interval_secs} s ticks than {width} timeline columns"
        )));
    }

    let last_col = f64::from(width - 1);
    let mut out = Vec::new();
    let mut secs = 0u32;
    while f64::from(secs) <= duration_secs {
        let x = (f64::from(secs) / duration_secs * last_col).round() as u32;
        out.push(Tick {
            secs,
            x,
            label: format_mss(secs),
        });
        let Some(next) = secs.checked_add(interval_secs) else {
            break;
        };
        secs = next;
    }
    Ok(out)
}

/// `M:SS`, minutes unpadded.
pub fn format_mss(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub(crate) fn check_duration(duration_secs: f64) -> BandwaveResult<()> {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(BandwaveError::degenerate(format!(
            "track duration must be positive and finite (got {duration_secs})"
        )));
    }
    Ok(())
}
