use std::net::{IpAddr, Ipv4Addr};

use axum::http::HeaderMap;

/// Best-effort client address for rate-limit keys. Behind nginx the real
/// address arrives in `x-forwarded-for`; we take the first (client-most) hop.
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    if let Some(real_ip) = header_str(headers, "x-real-ip") {
        return real_ip.trim().to_string();
    }
    "unknown".to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Whether an address is exempt from the geographic upload budget.
///
/// Local and private-network traffic is always exempt. For everything else we
/// are deliberately permissive: there is no GeoIP lookup wired up yet, and
/// blocking a relative uploading from abroad would be far worse than letting
/// the odd bot through the per-IP budgets.
///
/// TODO: check against actual Icelandic IP ranges once a GeoIP source is
/// chosen, and let the geographic budget do its job.
pub fn is_local_ip(ip: &str) -> bool {
    if ip == "unknown" || ip == "localhost" {
        return true;
    }
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) if v4.is_loopback() || v4.is_private() || is_carrier_grade_nat(v4) => {
            return true;
        }
        Ok(IpAddr::V6(v6)) if v6.is_loopback() => return true,
        _ => {}
    }
    // Permissive fallback until region lookup exists.
    true
}

fn is_carrier_grade_nat(v4: Ipv4Addr) -> bool {
    let octets = v4.octets();
    octets[0] == 100 && (64..=127).contains(&octets[1])
}
