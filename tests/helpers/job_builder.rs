// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use yoghurt_sequencer::domain::job::Job;
use yoghurt_sequencer::domain::types::MachineLine;

// ==========================================
// Job 构建器
// ==========================================

pub struct JobBuilder {
    job: Job,
}

impl JobBuilder {
    pub fn new(product_name: &str) -> Self {
        Self {
            job: Job::new(product_name),
        }
    }

    pub fn pack(mut self, grams: f64) -> Self {
        self.job.pack_size_g = Some(grams);
        self
    }

    pub fn flavour(mut self, label: &str) -> Self {
        self.job.flavour_label = label.to_string();
        self
    }

    pub fn plain(mut self) -> Self {
        self.job.is_plain = true;
        self
    }

    pub fn granola(mut self) -> Self {
        self.job.is_granola = true;
        self
    }

    pub fn chocolate(mut self) -> Self {
        self.job.has_chocolate = true;
        self
    }

    pub fn nut_risk(mut self) -> Self {
        self.job.has_nut_risk = true;
        self
    }

    pub fn ph(mut self, ph: f64) -> Self {
        self.job.ph = Some(ph);
        self
    }

    pub fn machine(mut self, machine: MachineLine) -> Self {
        self.job.machine = Some(machine);
        self
    }

    pub fn quantity(mut self, field: &str, value: f64) -> Self {
        self.job.quantities.insert(field.to_string(), value);
        self
    }

    pub fn build(self) -> Job {
        self.job
    }
}

// ==========================================
// 常用任务
// ==========================================

pub fn plain_pot() -> Job {
    JobBuilder::new("Plain 150g")
        .pack(150.0)
        .flavour("plain")
        .plain()
        .ph(4.3)
        .machine(MachineLine::M1)
        .build()
}

pub fn vanilla_pot() -> Job {
    JobBuilder::new("Vanilla 150g")
        .pack(150.0)
        .flavour("vanilla")
        .ph(4.3)
        .machine(MachineLine::M1)
        .build()
}

pub fn granola_pot(name: &str) -> Job {
    JobBuilder::new(name)
        .pack(150.0)
        .flavour("granola")
        .granola()
        .ph(4.3)
        .machine(MachineLine::M3)
        .build()
}

/// 一批覆盖所有产线的混合任务（含重复 SKU）
pub fn mixed_batch() -> Vec<Job> {
    vec![
        JobBuilder::new("Vanilla 150g").pack(150.0).flavour("vanilla").ph(4.2).quantity("packed_trays", 10.0).build(),
        JobBuilder::new("Greek Natural 150g").pack(150.0).flavour("plain").plain().ph(4.4).quantity("packed_trays", 8.0).build(),
        JobBuilder::new("Choc Hazelnut 170g").pack(170.0).flavour("white_choc").chocolate().nut_risk().ph(4.1).quantity("packed_trays", 6.0).build(),
        JobBuilder::new("Vanilla 150g").pack(150.0).flavour("vanilla").ph(4.2).quantity("packed_trays", 4.0).build(),
        JobBuilder::new("C.Vanilla 450g").pack(450.0).flavour("vanilla").ph(4.0).quantity("packed_kg", 90.0).build(),
        JobBuilder::new("Honey Granola 150g").pack(150.0).flavour("honey").granola().ph(4.3).build(),
        JobBuilder::new("SS Strawberry 170g").pack(170.0).flavour("strawberry").ph(3.9).build(),
        JobBuilder::new("Natural 5kg").pack(5000.0).flavour("plain").plain().ph(4.5).quantity("packed_kg", 500.0).build(),
        JobBuilder::new("Mango 175g").pack(175.0).flavour("mango").build(),
        JobBuilder::new("Mystery Product").machine(MachineLine::Unknown).build(),
    ]
}
