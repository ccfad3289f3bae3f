//! ELM327 command formatting and reply parsing

use crate::error::ObdError;

/// Prompt character the adapter sends when ready for the next command
pub(crate) const PROMPT: u8 = b'>';

/// AT commands sent once after opening the port: reset, echo off,
/// linefeeds off, headers off
pub(crate) const INIT_SEQUENCE: [&str; 4] = ["ATZ", "ATE0", "ATL0", "ATH0"];

/// Format an OBD request (e.g. `010C`)
pub(crate) fn format_request(mode: u8, pid: Option<u8>) -> String {
    match pid {
        Some(pid) => format!("{:02X}{:02X}", mode, pid),
        None => format!("{:02X}", mode),
    }
}

/// Parse a raw reply into the data payload of every message answering `mode`/`pid`
///
/// The returned payloads exclude the response mode byte and, if given, the PID.
/// Multi-frame CAN replies (`00E` length line, then `0:`, `1:` ... frames) are
/// reassembled into one message first.
pub(crate) fn parse_reply(
    raw: &str,
    mode: u8,
    pid: Option<u8>,
) -> Result<Vec<Vec<u8>>, ObdError> {
    let request = format_request(mode, pid);
    let mut messages = Vec::new();
    let mut multi_frame: Option<MultiFrame> = None;

    for line in raw
        .split(|c| c == '\r' || c == '\n' || c == PROMPT as char)
        .map(str::trim)
        .filter(|line| !line.is_empty())
    {
        let upper = line.to_ascii_uppercase();
        if upper.starts_with("SEARCHING") || upper.starts_with("BUS INIT") || upper == request {
            continue;
        }
        match upper.as_str() {
            "NO DATA" => return Err(ObdError::NoData(request)),
            "?" => return Err(ObdError::InvalidResponse(format!("{} rejected", request))),
            "UNABLE TO CONNECT" | "CAN ERROR" | "BUS ERROR" | "STOPPED" => {
                return Err(ObdError::VehicleNotConnected)
            }
            _ => {}
        }

        if let Some(len) = parse_frame_length(&upper) {
            if let Some(done) = multi_frame.replace(MultiFrame::new(Some(len))) {
                messages.push(done.into_bytes());
            }
            continue;
        }
        if let Some(data) = strip_frame_index(&upper) {
            if let Some(bytes) = parse_hex_line(data) {
                multi_frame
                    .get_or_insert_with(|| MultiFrame::new(None))
                    .bytes
                    .extend(bytes);
            }
            continue;
        }
        if let Some(bytes) = parse_hex_line(&upper) {
            messages.push(bytes);
        }
    }
    if let Some(done) = multi_frame {
        messages.push(done.into_bytes());
    }

    let header_len = if pid.is_some() { 2 } else { 1 };
    let payloads: Vec<Vec<u8>> = messages
        .into_iter()
        .filter(|bytes| bytes.len() >= header_len && bytes[0] == mode + 0x40)
        .filter(|bytes| pid.map_or(true, |pid| bytes[1] == pid))
        .map(|bytes| bytes[header_len..].to_vec())
        .collect();

    if payloads.is_empty() {
        return Err(ObdError::InvalidResponse(format!(
            "no answer to {} in {:?}",
            request, raw
        )));
    }
    Ok(payloads)
}

/// Frames of one ISO-TP message, truncated to the announced length
struct MultiFrame {
    len: Option<usize>,
    bytes: Vec<u8>,
}

impl MultiFrame {
    fn new(len: Option<usize>) -> Self {
        Self {
            len,
            bytes: Vec::new(),
        }
    }

    fn into_bytes(mut self) -> Vec<u8> {
        if let Some(len) = self.len {
            self.bytes.truncate(len);
        }
        self.bytes
    }
}

/// Length line preceding a multi-frame reply, three hex digits (e.g. `00E`)
fn parse_frame_length(line: &str) -> Option<usize> {
    if line.len() != 3 || !line.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    usize::from_str_radix(line, 16).ok()
}

/// Data after a single hex digit frame index such as `0:` or `A:`
fn strip_frame_index(line: &str) -> Option<&str> {
    let (index, data) = line.split_once(':')?;
    let index = index.trim();
    (index.len() == 1 && index.bytes().all(|b| b.is_ascii_hexdigit())).then_some(data)
}

fn parse_hex_line(line: &str) -> Option<Vec<u8>> {
    let digits: Vec<u8> = line.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.is_empty() || digits.len() % 2 != 0 {
        return None;
    }

    digits
        .chunks_exact(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(text, 16).ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_request() {
        assert_eq!(format_request(0x01, Some(0x0C)), "010C");
        assert_eq!(format_request(0x03, None), "03");
    }

    #[test]
    fn test_parse_rpm_reply() {
        let payloads = parse_reply("41 0C 1A F8 \r\r>", 0x01, Some(0x0C)).unwrap();
        assert_eq!(payloads, vec![vec![0x1A, 0xF8]]);
    }

    #[test]
    fn test_parse_skips_searching_and_echo() {
        let raw = "010D\rSEARCHING...\r410D24\r\r>";
        let payloads = parse_reply(raw, 0x01, Some(0x0D)).unwrap();
        assert_eq!(payloads, vec![vec![0x24]]);
    }

    #[test]
    fn test_parse_no_data() {
        let err = parse_reply("NO DATA\r\r>", 0x01, Some(0x11)).unwrap_err();
        assert!(matches!(err, ObdError::NoData(_)));
    }

    #[test]
    fn test_parse_unable_to_connect() {
        let err = parse_reply("UNABLE TO CONNECT\r>", 0x01, Some(0x0C)).unwrap_err();
        assert!(matches!(err, ObdError::VehicleNotConnected));
    }

    #[test]
    fn test_parse_dtc_multi_ecu() {
        let raw = "43 01 33 00 00 00 00\r43 04 20 00 00 00 00\r\r>";
        let payloads = parse_reply(raw, 0x03, None).unwrap();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[1][..2], [0x04, 0x20]);
    }

    #[test]
    fn test_parse_garbage_is_invalid() {
        let err = parse_reply("OK\r>", 0x01, Some(0x0C)).unwrap_err();
        assert!(matches!(err, ObdError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_multi_frame_dtcs() {
        let raw = "00A\r0: 43 04 01 33 04 20\r1: C1 00 01 71 00 00 00\r\r>";
        let payloads = parse_reply(raw, 0x03, None).unwrap();
        assert_eq!(
            payloads,
            vec![vec![0x04, 0x01, 0x33, 0x04, 0x20, 0xC1, 0x00, 0x01, 0x71]]
        );

        let codes = crate::dtc::Dtc::decode_payload(&payloads[0]);
        assert_eq!(codes.len(), 4);
        assert_eq!(codes[3].code(), "P0171");
    }

    #[test]
    fn test_frame_index_without_length_line() {
        let raw = "0: 43 01 01 33\r\r>";
        let payloads = parse_reply(raw, 0x03, None).unwrap();
        assert_eq!(payloads, vec![vec![0x01, 0x01, 0x33]]);
    }
}
