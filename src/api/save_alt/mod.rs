// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod handler;
pub mod request;
pub mod response;

pub use handler::save_alt_handler;
pub use request::SaveAltRequest;
pub use response::SaveAltResponse;
