use alloy::primitives::U256;
use bytesize::ByteSize;
use owo_colors::OwoColorize;

/// Init code size limit from EIP-3860, in KiB.
pub const MAX_INIT_CODE_SIZE_KIB: u64 = 48;

pub fn format_gas(gas: u128) -> String {
    let gas: u64 = gas.try_into().unwrap_or(u64::MAX);
    let text = format!("{gas} gas");
    if gas <= 3_000_000 {
        text.bright_green().to_string()
    } else if gas <= 7_000_000 {
        text.yellow().to_string()
    } else {
        text.bright_purple().to_string()
    }
}

/// Pretty-prints a file size based on its limits.
pub fn format_file_size(len: usize, mid: u64, max: u64) -> String {
    let len = ByteSize::b(len as u64);
    let mid = ByteSize::kib(mid);
    let max = ByteSize::kib(max);
    if len <= mid {
        len.bright_green().to_string()
    } else if len <= max {
        len.yellow().to_string()
    } else {
        len.bright_purple().to_string()
    }
}

/// Pretty-prints the size of contract creation code.
pub fn format_init_code_size(len: usize) -> String {
    format_file_size(len, MAX_INIT_CODE_SIZE_KIB / 2, MAX_INIT_CODE_SIZE_KIB)
}

/// Pretty-prints a transaction cost given in wei.
pub fn format_cost(wei: U256) -> eyre::Result<String> {
    let gwei: u64 = (wei / U256::from(1_000_000_000u64)).try_into()?;
    let ether = gwei as f64 / 1e9;
    let text = format!("Ξ{ether:.6}");
    let text = if ether <= 0.01 {
        text.bright_green().to_string()
    } else if ether <= 0.1 {
        text.yellow().to_string()
    } else {
        text.bright_purple().to_string()
    };

    Ok(text)
}
