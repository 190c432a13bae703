use super::crud::Resource;
use crate::AppState;
use crate::database::DynRepository;
use crate::database::models::{Employee, EmployeeInput};

pub struct Employees;

impl Resource for Employees {
    type Entity = Employee;
    type Detail = Employee;
    type Input = EmployeeInput;

    const NAME: &'static str = "Employee";
    const PATH: &'static str = "/employees";

    fn repository(state: &AppState) -> DynRepository<Employee, Employee, EmployeeInput> {
        state.employees.clone()
    }
}
