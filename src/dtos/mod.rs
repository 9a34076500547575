pub mod bookings;
pub mod services;

pub use bookings::{
    BookingListParams, BookingResponse, CreateBookingRequest, CreateBookingResponse,
    SuccessResponse,
};
pub use services::{
    ConfirmationResponse, CreateServiceRequest, CreateServiceResponse, OwnerParams, ReviewRequest,
    ServiceListParams, ServiceResponse, UpdateServiceRequest,
};
