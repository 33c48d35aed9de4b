//! Closed vocabularies for sectors and investment themes.
//!
//! Labels are matched case-insensitively after trimming, and always serialized in their
//! canonical spelling.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Sector {
	Technology,
	Healthcare,
	FinancialServices,
	Industrials,
	Energy,
	Utilities,
	ConsumerCyclical,
	ConsumerDefensive,
	BasicMaterials,
	RealEstate,
	CommunicationServices,
	Cybersecurity,
	CleanEnergy,
	EdTech,
	HealthTech,
	EnterpriseSaas,
	FinTech,
}
impl Sector {
	pub const ALL: [Self; 17] = [
		Self::Technology,
		Self::Healthcare,
		Self::FinancialServices,
		Self::Industrials,
		Self::Energy,
		Self::Utilities,
		Self::ConsumerCyclical,
		Self::ConsumerDefensive,
		Self::BasicMaterials,
		Self::RealEstate,
		Self::CommunicationServices,
		Self::Cybersecurity,
		Self::CleanEnergy,
		Self::EdTech,
		Self::HealthTech,
		Self::EnterpriseSaas,
		Self::FinTech,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Technology => "Technology",
			Self::Healthcare => "Healthcare",
			Self::FinancialServices => "Financial Services",
			Self::Industrials => "Industrials",
			Self::Energy => "Energy",
			Self::Utilities => "Utilities",
			Self::ConsumerCyclical => "Consumer Cyclical",
			Self::ConsumerDefensive => "Consumer Defensive",
			Self::BasicMaterials => "Basic Materials",
			Self::RealEstate => "Real Estate",
			Self::CommunicationServices => "Communication Services",
			Self::Cybersecurity => "Cybersecurity",
			Self::CleanEnergy => "Clean Energy",
			Self::EdTech => "EdTech",
			Self::HealthTech => "HealthTech",
			Self::EnterpriseSaas => "Enterprise SaaS",
			Self::FinTech => "FinTech",
		}
	}

	pub fn parse(label: &str) -> Result<Self> {
		find_label(&Self::ALL, label, |sector| sector.as_str())
			.ok_or_else(|| Error::UnknownLabel { kind: "sector", label: label.to_string() })
	}

	pub fn labels() -> Vec<&'static str> {
		Self::ALL.iter().map(|sector| sector.as_str()).collect()
	}
}
impl Display for Sector {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
impl TryFrom<String> for Sector {
	type Error = Error;

	fn try_from(value: String) -> Result<Self> {
		Self::parse(&value)
	}
}
impl From<Sector> for &'static str {
	fn from(value: Sector) -> Self {
		value.as_str()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum ThemeGroup {
	HealthcareLifeSciences,
	EnterpriseAiAutomationData,
	Cybersecurity,
	EnergySustainabilityCleanTech,
	FintechPayments,
	EducationUpskilling,
	GovernmentDefenseTech,
}
impl ThemeGroup {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::HealthcareLifeSciences => "Healthcare & Life Sciences",
			Self::EnterpriseAiAutomationData => "Enterprise AI, Automation & Data",
			Self::Cybersecurity => "Cybersecurity",
			Self::EnergySustainabilityCleanTech => "Energy, Sustainability & Clean Tech",
			Self::FintechPayments => "Fintech & Payments",
			Self::EducationUpskilling => "Education & Upskilling",
			Self::GovernmentDefenseTech => "Government & Defense Tech",
		}
	}
}
impl From<ThemeGroup> for &'static str {
	fn from(value: ThemeGroup) -> Self {
		value.as_str()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Theme {
	PrecisionOncologyGenomicDiagnostics,
	MedicalImagingDevices,
	VirtualCareDigitalHealth,
	LifeSciencesCloudDataPlatforms,
	CroClinicalServices,
	EnterpriseAiPlatforms,
	AgenticAiPlatforms,
	RpaProcessAutomation,
	DigitalWorkflowItsm,
	CrmCustomer360Platforms,
	DataCloudWarehouseSharing,
	ObservabilityMonitoringLogging,
	SearchVectorDbSearchAi,
	EndpointWorkloadProtectionXdr,
	CloudNetworkSecuritySase,
	SecurityAnalyticsSiemSoar,
	SolarInvertersHomeEnergySystems,
	EnergyStorageSolutions,
	EnergyManagementSoftware,
	SolarBatteryEbosComponents,
	EvChargingInfrastructure,
	EsgSustainabilityAnalytics,
	BnplAlternativeConsumerFinance,
	EdTechLanguageLearning,
	IntelligenceDefenseSoftware,
	GovTechSuites,
}
impl Theme {
	pub const ALL: [Self; 26] = [
		Self::PrecisionOncologyGenomicDiagnostics,
		Self::MedicalImagingDevices,
		Self::VirtualCareDigitalHealth,
		Self::LifeSciencesCloudDataPlatforms,
		Self::CroClinicalServices,
		Self::EnterpriseAiPlatforms,
		Self::AgenticAiPlatforms,
		Self::RpaProcessAutomation,
		Self::DigitalWorkflowItsm,
		Self::CrmCustomer360Platforms,
		Self::DataCloudWarehouseSharing,
		Self::ObservabilityMonitoringLogging,
		Self::SearchVectorDbSearchAi,
		Self::EndpointWorkloadProtectionXdr,
		Self::CloudNetworkSecuritySase,
		Self::SecurityAnalyticsSiemSoar,
		Self::SolarInvertersHomeEnergySystems,
		Self::EnergyStorageSolutions,
		Self::EnergyManagementSoftware,
		Self::SolarBatteryEbosComponents,
		Self::EvChargingInfrastructure,
		Self::EsgSustainabilityAnalytics,
		Self::BnplAlternativeConsumerFinance,
		Self::EdTechLanguageLearning,
		Self::IntelligenceDefenseSoftware,
		Self::GovTechSuites,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::PrecisionOncologyGenomicDiagnostics => "Precision Oncology & Genomic Diagnostics",
			Self::MedicalImagingDevices => "Medical Imaging & Devices",
			Self::VirtualCareDigitalHealth => "Virtual Care & Digital Health",
			Self::LifeSciencesCloudDataPlatforms => "Life Sciences Cloud & Data Platforms",
			Self::CroClinicalServices => "CRO & Clinical Services",
			Self::EnterpriseAiPlatforms => "Enterprise AI Platforms",
			Self::AgenticAiPlatforms => "Agentic AI Platforms",
			Self::RpaProcessAutomation => "RPA & Process Automation",
			Self::DigitalWorkflowItsm => "Digital Workflow & ITSM",
			Self::CrmCustomer360Platforms => "CRM / Customer 360 Platforms",
			Self::DataCloudWarehouseSharing => "Data Cloud / Warehouse & Sharing",
			Self::ObservabilityMonitoringLogging => "Observability, Monitoring & Logging",
			Self::SearchVectorDbSearchAi => "Search / Vector DB / Search AI",
			Self::EndpointWorkloadProtectionXdr => "Endpoint & Workload Protection / XDR",
			Self::CloudNetworkSecuritySase => "Cloud & Network Security / SASE",
			Self::SecurityAnalyticsSiemSoar => "Security Analytics / SIEM / SOAR",
			Self::SolarInvertersHomeEnergySystems => "Solar Inverters & Home Energy Systems",
			Self::EnergyStorageSolutions => "Energy Storage Solutions",
			Self::EnergyManagementSoftware => "Energy Management Software",
			Self::SolarBatteryEbosComponents => "Solar/Battery EBOS Components",
			Self::EvChargingInfrastructure => "EV Charging Infrastructure",
			Self::EsgSustainabilityAnalytics => "ESG & Sustainability Analytics",
			Self::BnplAlternativeConsumerFinance => "BNPL & Alternative Consumer Finance",
			Self::EdTechLanguageLearning => "EdTech & Language Learning",
			Self::IntelligenceDefenseSoftware => "Intelligence / Defense Software",
			Self::GovTechSuites => "GovTech Suites (State/Local)",
		}
	}

	pub fn parent(self) -> ThemeGroup {
		match self {
			Self::PrecisionOncologyGenomicDiagnostics
			| Self::MedicalImagingDevices
			| Self::VirtualCareDigitalHealth
			| Self::LifeSciencesCloudDataPlatforms
			| Self::CroClinicalServices => ThemeGroup::HealthcareLifeSciences,
			Self::EnterpriseAiPlatforms
			| Self::AgenticAiPlatforms
			| Self::RpaProcessAutomation
			| Self::DigitalWorkflowItsm
			| Self::CrmCustomer360Platforms
			| Self::DataCloudWarehouseSharing
			| Self::ObservabilityMonitoringLogging
			| Self::SearchVectorDbSearchAi => ThemeGroup::EnterpriseAiAutomationData,
			Self::EndpointWorkloadProtectionXdr
			| Self::CloudNetworkSecuritySase
			| Self::SecurityAnalyticsSiemSoar => ThemeGroup::Cybersecurity,
			Self::SolarInvertersHomeEnergySystems
			| Self::EnergyStorageSolutions
			| Self::EnergyManagementSoftware
			| Self::SolarBatteryEbosComponents
			| Self::EvChargingInfrastructure
			| Self::EsgSustainabilityAnalytics => ThemeGroup::EnergySustainabilityCleanTech,
			Self::BnplAlternativeConsumerFinance => ThemeGroup::FintechPayments,
			Self::EdTechLanguageLearning => ThemeGroup::EducationUpskilling,
			Self::IntelligenceDefenseSoftware | Self::GovTechSuites => {
				ThemeGroup::GovernmentDefenseTech
			},
		}
	}

	pub fn parse(label: &str) -> Result<Self> {
		find_label(&Self::ALL, label, |theme| theme.as_str())
			.ok_or_else(|| Error::UnknownLabel { kind: "theme", label: label.to_string() })
	}

	pub fn labels() -> Vec<&'static str> {
		Self::ALL.iter().map(|theme| theme.as_str()).collect()
	}
}
impl Display for Theme {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
impl TryFrom<String> for Theme {
	type Error = Error;

	fn try_from(value: String) -> Result<Self> {
		Self::parse(&value)
	}
}
impl From<Theme> for &'static str {
	fn from(value: Theme) -> Self {
		value.as_str()
	}
}

fn find_label<T: Copy>(all: &[T], label: &str, as_str: impl Fn(T) -> &'static str) -> Option<T> {
	let wanted = label.trim();

	all.iter().copied().find(|item| as_str(*item).eq_ignore_ascii_case(wanted))
}
