//! 作业农场（jobs app）的迁移记录

pub mod m0001_initial;
pub mod m0002_auto_20161011_1336;
pub mod m0003_auto_20161011_1359;
pub mod m0009_farmjob_progress;
pub mod m0010_farmjob_ext_take;
