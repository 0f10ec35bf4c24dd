use std::path::PathBuf;

use ocl::{Context, Device, Platform, Program, Queue};

use crate::common::{Error, Result};
use crate::ops::BINS;

/// OpenCL execution environment: first available platform, first GPU-class
/// device on it, one context and one in-order command queue.
pub struct OclContext {
    device: Device,
    context: Context,
    queue: Queue,
}

impl OclContext {
    pub fn new() -> Result<OclContext> {
        let platform = Platform::list()
            .into_iter()
            .next()
            .ok_or_else(|| Error::Gpu("no OpenCL platform available".to_string()))?;

        let device = Device::list(platform, Some(ocl::flags::DeviceType::GPU))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Gpu("no GPU device on the first platform".to_string()))?;

        let context = Context::builder()
            .platform(platform)
            .devices(device)
            .build()?;

        let queue = Queue::new(&context, device, None)?;

        log::info!("OpenCL device: {}", device.name()?);

        Ok(OclContext {
            device,
            context,
            queue,
        })
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }
}

/// Compiled histogram-equalization program.
///
/// Building it compiles the kernel source for the context's device; a compile
/// failure surfaces the build log and nothing is ever dispatched.
pub struct GpuHistEqPipeline {
    program: Program,
    scan_on_device: bool,
}

impl GpuHistEqPipeline {
    pub fn new(ctx: &OclContext, source: &str) -> Result<GpuHistEqPipeline> {
        let program = Program::builder()
            .devices(ctx.device())
            .src(source)
            .build(ctx.context())
            .map_err(|e| {
                // The ocl error text carries the compiler's build log.
                log::error!("OpenCL program build failed:\n{}", e);
                Error::Gpu(e.to_string())
            })?;

        // The scan kernel needs one 256-item work-group per channel. Devices
        // that cannot host that group size get the cumulative tables computed
        // on the host between the two remaining dispatches instead.
        let max_wg_size = ctx.device().max_wg_size()?;
        let scan_on_device = max_wg_size >= BINS;
        if !scan_on_device {
            log::warn!(
                "device work-group limit {} is below {}; computing cumulative tables on the host",
                max_wg_size,
                BINS
            );
        }

        Ok(GpuHistEqPipeline {
            program,
            scan_on_device,
        })
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn scan_on_device(&self) -> bool {
        self.scan_on_device
    }
}

/// Path of the kernel source side file: the running executable's own path
/// with `.cl` appended.
pub fn program_path_for_exe() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let mut path = exe.into_os_string();
    path.push(".cl");
    Ok(PathBuf::from(path))
}
