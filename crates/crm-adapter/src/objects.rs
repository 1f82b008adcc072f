//! Built-in definitions for the core HubSpot object types.
//!
//! Only commonly used default properties are listed; portals with custom properties declare
//! their own types with [`crm_object!`](crate::crm_object).

crate::crm_object! {
    /// A person (`contact`, type id `0-1`).
    pub Contact("contact") => ContactProperty {
        ObjectId = "hs_object_id",
        Email = "email",
        FirstName = "firstname",
        LastName = "lastname",
        Phone = "phone",
        Company = "company",
        LifecycleStage = "lifecyclestage",
        OwnerId = "hubspot_owner_id",
    }
}

crate::crm_object! {
    /// An organization (`company`, type id `0-2`).
    pub Company("company") => CompanyProperty {
        ObjectId = "hs_object_id",
        Name = "name",
        Domain = "domain",
        Industry = "industry",
        Phone = "phone",
        City = "city",
        OwnerId = "hubspot_owner_id",
    }
}

crate::crm_object! {
    /// A sales opportunity (`deal`, type id `0-3`).
    pub Deal("deal") => DealProperty {
        ObjectId = "hs_object_id",
        Name = "dealname",
        Amount = "amount",
        Stage = "dealstage",
        Pipeline = "pipeline",
        CloseDate = "closedate",
        OwnerId = "hubspot_owner_id",
    }
}

crate::crm_object! {
    /// A support request (`ticket`, type id `0-5`).
    pub Ticket("ticket") => TicketProperty {
        ObjectId = "hs_object_id",
        Subject = "subject",
        Content = "content",
        Pipeline = "hs_pipeline",
        Stage = "hs_pipeline_stage",
        Priority = "hs_ticket_priority",
        OwnerId = "hubspot_owner_id",
    }
}
