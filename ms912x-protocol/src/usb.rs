//! USB identification and transfer parameters
//!
//! Enumeration and interface claiming belong to the USB backend; these
//! constants tell it which devices and requests to use.

/// Vendor-specific interface class
pub const INTERFACE_CLASS_VENDOR_SPEC: u8 = 0xFF;

/// Interface number carrying the display function
pub const DISPLAY_INTERFACE: u8 = 3;

/// Bulk OUT endpoint for frame updates
pub const BULK_OUT_ENDPOINT: u8 = 0x04;

/// HID class request used to send a register report
pub const HID_REQ_SET_REPORT: u8 = 0x09;

/// HID class request used to fetch a register read response
pub const HID_REQ_GET_REPORT: u8 = 0x01;

/// `wValue` of both report requests (feature report, id 0)
pub const REPORT_VALUE: u16 = 0x0300;

/// `wIndex` of both report requests
pub const REPORT_INDEX: u16 = 0;

/// Timeout for a single control or bulk transfer
pub const TRANSFER_TIMEOUT_MS: u32 = 5000;

/// A supported vendor/product pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId {
    pub vendor: u16,
    pub product: u16,
}

/// Adapters known to speak this protocol
pub const SUPPORTED_DEVICES: [DeviceId; 4] = [
    DeviceId { vendor: 0x534d, product: 0x6021 },
    DeviceId { vendor: 0x534d, product: 0x0821 },
    DeviceId { vendor: 0x345f, product: 0x9132 },
    DeviceId { vendor: 0x345f, product: 0x9133 },
];

/// Check whether an interface belongs to a supported adapter
pub fn is_display_interface(vendor: u16, product: u16, interface: u8, class: u8) -> bool {
    interface == DISPLAY_INTERFACE
        && class == INTERFACE_CLASS_VENDOR_SPEC
        && SUPPORTED_DEVICES
            .iter()
            .any(|id| id.vendor == vendor && id.product == product)
}
