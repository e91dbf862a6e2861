//! Data Transfer Objects (DTOs)
//!
//! DTOs are used for API boundaries and use case inputs/outputs.

mod catalog_dto;
mod dashboard_dto;
mod invoice_dto;
mod order_dto;
mod registry_dto;

pub use catalog_dto::{
    PipelineStageDto, PipelineStageInputDto, VendorDto, VendorRoleDto, VendorRoleInputDto,
};
pub use dashboard_dto::DashboardDto;
pub use invoice_dto::{InvoiceAmountsDto, InvoiceDto, InvoiceOrdersDto};
pub use order_dto::{
    AddStageDto, OrderDetailDto, OrderDto, OrderHitDto, OrderInputDto, OrderQueryDto,
    OrderStageDto, StageUpdateDto, StatusOverrideDto, UpdateStageDto,
};
pub use registry_dto::{
    CustomerDto, CustomerHitDto, MeasurementDto, MeasurementHitDto, MeasurementInputDto,
};
