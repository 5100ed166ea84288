//! Generated gRPC types for the todo projection.

pub mod todos {
    pub mod v1 {
        tonic::include_proto!("todos.v1");
    }
}

