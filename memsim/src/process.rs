use crate::helpe::*;

impl Process {
    pub fn new(id: ProcId, size: Steps, time: Steps) -> Self {
        Self {
            id,
            size,
            time,
        }
    }
}

//-----TREATING GROUPS OF PROCESSES (START)---------------------
/*
   Processes are placed and scheduled in order of increasing size.
   Ties go to whoever was submitted first, and since ids follow
   submission order, `(size, id)` is the whole story.
*/
impl Ord for Process {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.size.cmp(&other.size)
            .then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for Process {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Process {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Process {}

impl std::hash::Hash for Process {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
//-----TREATING GROUPS OF PROCESSES (END)---------------------
