// ============================================================
// Layer 5 — Backend Selection
// ============================================================
// Training needs an autodiff backend; evaluation runs on its
// inner backend through `AutodiffModule::valid()`.
//
//   --device cpu  →  Autodiff<NdArray>   (pure Rust, always available)
//   --device gpu  →  Autodiff<Wgpu>      (Vulkan / Metal / DX12)
//
// Reference: Burn Book §2 (Backends)

use burn::backend::{wgpu::WgpuDevice, Autodiff, NdArray, Wgpu};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub type CpuBackend = Autodiff<NdArray>;
pub type GpuBackend = Autodiff<Wgpu>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Cpu,
    Gpu,
}

impl DeviceKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Gpu => "gpu",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu"                  => Ok(Self::Cpu),
            "gpu" | "wgpu" | "cuda" => Ok(Self::Gpu),
            other                  => Err(format!("unknown device '{other}' (expected cpu or gpu)")),
        }
    }
}

pub fn gpu_device() -> WgpuDevice {
    WgpuDevice::default()
}
