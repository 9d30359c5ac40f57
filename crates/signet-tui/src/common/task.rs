#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Submit,
    Logout,
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Marks a task as in flight as soon as the reducer issues it, before
    /// the runtime reports `TaskStarted`.
    pub fn begin(&mut self, id: TaskId) {
        self.active = Some(id);
    }

    pub fn on_started(&mut self, started: &TaskStarted) {
        self.active = Some(started.id);
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
        }
        ok
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub submit: TaskState,
    pub logout: TaskState,
}

impl Tasks {
    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Submit => &mut self.submit,
            TaskKind::Logout => &mut self.logout,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.submit.is_running() || self.logout.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_ids_are_sequential() {
        let mut seq = TaskSeq::default();
        assert_eq!(seq.next_id(), TaskId(0));
        assert_eq!(seq.next_id(), TaskId(1));
    }

    #[test]
    fn test_finish_only_matches_active_task() {
        let mut tasks = Tasks::default();
        tasks.state_mut(TaskKind::Submit).begin(TaskId(3));

        assert!(tasks.is_any_running());
        assert!(!tasks.submit.finish_if_active(TaskId(2)));
        assert!(tasks.submit.is_running());
        assert!(tasks.submit.finish_if_active(TaskId(3)));
        assert!(!tasks.is_any_running());
    }
}
