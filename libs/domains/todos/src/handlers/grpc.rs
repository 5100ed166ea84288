use rpc::todos::v1::todo_service_server::TodoService as TodoRpc;
use rpc::todos::v1::{ListTodosRequest, TodoList};
use tonic::{Request, Response, Status};

use crate::conversions::todo_list;
use crate::query::TodoQuery;
use crate::repository::TodoRepository;
use crate::service::TodoService;

/// Read-only gRPC projection over the same [`TodoService`] the REST routes use.
pub struct TodoGrpcService<R: TodoRepository> {
    service: TodoService<R>,
}

impl<R: TodoRepository> TodoGrpcService<R> {
    pub fn new(service: TodoService<R>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl<R: TodoRepository + 'static> TodoRpc for TodoGrpcService<R> {
    async fn list_todos(
        &self,
        _request: Request<ListTodosRequest>,
    ) -> Result<Response<TodoList>, Status> {
        let todos = self.service.list_todos(&TodoQuery::default()).await?;

        tracing::debug!(count = todos.len(), "ListTodos");
        Ok(Response::new(todo_list(todos)))
    }
}
