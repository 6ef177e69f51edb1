pub mod branch;
pub mod checksum;
pub mod delta;
pub mod lzma;
pub mod ppmd;

pub use branch::{BranchArch, BranchConverter};
pub use checksum::{crc32, crc64, crc64_update};
pub use delta::{DeltaState, DELTA_STATE_SIZE};
pub use lzma::{
    lzma_decode, LzmaDecoded, LzmaEncoder, LzmaEncoderProps, LzmaProperties, LzmaStatus,
    LZMA_PROPS_SIZE,
};
pub use ppmd::{
    PpmdDecoder, PpmdEncoder, PPMD_MAX_MEM_SIZE, PPMD_MAX_ORDER, PPMD_MIN_MEM_SIZE, PPMD_MIN_ORDER,
};
