use anyhow::{bail, Context, Result};
use gpio_keyboard::Channel;

/// One recorded edge from a trace file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEdge {
    pub millis: u64,
    pub channel: Channel,
    /// 1-based source line, for diagnostics.
    pub line: usize,
}

/// Parse a trace of `<millis> <channel>` lines.
///
/// `#` starts a comment; blank lines are skipped. Timestamps must be
/// non-decreasing, as they would be from a monotonic clock.
pub fn parse_trace(input: &str) -> Result<Vec<TraceEdge>> {
    let mut edges: Vec<TraceEdge> = Vec::new();

    for (line_num, line) in input.lines().enumerate() {
        let line_no = line_num + 1;
        let content = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        let mut fields = content.split_whitespace();
        let Some(millis) = fields.next() else {
            continue;
        };

        let millis: u64 = millis
            .parse()
            .with_context(|| format!("line {}: invalid timestamp {:?}", line_no, millis))?;

        let Some(channel) = fields.next() else {
            bail!("line {}: missing channel", line_no);
        };
        let index: u8 = channel
            .parse()
            .with_context(|| format!("line {}: invalid channel {:?}", line_no, channel))?;
        let channel =
            Channel::try_from(index).with_context(|| format!("line {}", line_no))?;

        if let Some(extra) = fields.next() {
            bail!("line {}: unexpected field {:?}", line_no, extra);
        }

        if let Some(last) = edges.last() {
            if millis < last.millis {
                bail!(
                    "line {}: timestamp {} is earlier than {} on line {}",
                    line_no,
                    millis,
                    last.millis,
                    last.line
                );
            }
        }

        edges.push(TraceEdge {
            millis,
            channel,
            line: line_no,
        });
    }

    Ok(edges)
}
